// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::an::AttributeMap;
use crate::cv::Contour;
use crate::mp::FeatureVector;
use crate::mp::moments::centroid;

/// A measured and classified object
///
/// The `id` is the position of the object across all segments of an image
/// and `segment` is the index of the segment the contour was traced from.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    id: usize,
    segment: usize,
    contour: Contour,
    features: FeatureVector,
    attributes: AttributeMap,
}

impl ObjectRecord {
    pub fn new(
        id: usize,
        segment: usize,
        contour: Contour,
        features: FeatureVector,
        attributes: AttributeMap,
    ) -> Self {
        ObjectRecord {
            id,
            segment,
            contour,
            features,
            attributes,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Area centroid of the contour
    pub fn centroid(&self) -> Option<[f64; 2]> {
        centroid(&self.contour)
    }

    /// Features followed by attributes in a single json object
    ///
    /// # Examples
    ///
    /// ```
    /// use silhouette_core::an::{ObjectRecord, classify};
    /// use silhouette_core::mp::describe;
    ///
    /// let contour = vec![[0, 0], [0, 9], [9, 9], [9, 0]];
    /// let features = describe(&contour, None);
    /// let record = ObjectRecord::new(0, 0, contour, features, classify(&features));
    ///
    /// let flat = record.flattened();
    ///
    /// assert_eq!(flat["area"], 81.0);
    /// assert_eq!(flat["compact"], true);
    /// assert!(flat["skeleton_length"].is_null());
    /// ```
    pub fn flattened(&self) -> Map<String, Value> {
        let mut flat = match serde_json::to_value(self.features) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        for (attribute, value) in self.attributes.entries() {
            flat.insert(attribute.name().to_string(), Value::Bool(value));
        }

        flat
    }
}

impl Serialize for ObjectRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;

        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("segment", &self.segment)?;
        map.serialize_entry("points", &self.contour)?;
        map.serialize_entry("centroid", &self.centroid())?;
        map.serialize_entry("features", &self.features)?;
        map.serialize_entry("attributes", &self.attributes.active())?;
        map.serialize_entry("attribute_map", &self.attributes)?;

        map.end()
    }
}
