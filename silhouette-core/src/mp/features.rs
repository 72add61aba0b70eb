// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::constant::{
    CORNER_EPSILON_FRACTION, FEATURE_NAMES, MIN_POINTS_DEFECTS, MIN_POINTS_ELLIPSE,
    MIN_POINTS_FOURIER, SKELETON_SCALE,
};
use crate::cv::ellipse::ellipse_eccentricity;
use crate::cv::hull::{convex_hull_indices, convexity_defects};
use crate::cv::simplify::approximate_polygon;
use crate::cv::skeleton::skeleton_length;
use crate::im::ImageShape;
use crate::mp::{form, moments};

/// Shape descriptors of a single contour
///
/// Descriptors that need a minimum number of contour points, or an image
/// shape, are `None` when they were not computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    pub area: f64,
    pub perimeter: f64,
    pub circularity: f64,
    pub aspect_ratio: f64,
    pub extent: f64,
    pub solidity: f64,
    pub hu_moments: [f64; 7],
    pub num_defects: Option<u32>,
    pub eccentricity: Option<f64>,
    pub num_corners: u32,
    pub fourier_1_mag: Option<f64>,
    pub skeleton_length: Option<f64>,
}

impl FeatureVector {
    /// Look up a descriptor by its canonical name
    ///
    /// # Examples
    ///
    /// ```
    /// use silhouette_core::mp::FeatureVector;
    ///
    /// let features = FeatureVector { area: 12.0, num_corners: 4, ..Default::default() };
    ///
    /// assert_eq!(features.get("area"), Some(12.0));
    /// assert_eq!(features.get("num_corners"), Some(4.0));
    /// assert_eq!(features.get("eccentricity"), None);
    /// assert_eq!(features.get("unknown"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "area" => Some(self.area),
            "perimeter" => Some(self.perimeter),
            "circularity" => Some(self.circularity),
            "aspect_ratio" => Some(self.aspect_ratio),
            "extent" => Some(self.extent),
            "solidity" => Some(self.solidity),
            "hu_moment_1" => Some(self.hu_moments[0]),
            "hu_moment_2" => Some(self.hu_moments[1]),
            "hu_moment_3" => Some(self.hu_moments[2]),
            "hu_moment_4" => Some(self.hu_moments[3]),
            "hu_moment_5" => Some(self.hu_moments[4]),
            "hu_moment_6" => Some(self.hu_moments[5]),
            "hu_moment_7" => Some(self.hu_moments[6]),
            "num_defects" => self.num_defects.map(f64::from),
            "eccentricity" => self.eccentricity,
            "num_corners" => Some(self.num_corners as f64),
            "fourier_1_mag" => self.fourier_1_mag,
            "skeleton_length" => self.skeleton_length,
            _ => None,
        }
    }

    /// Descriptor names paired with their values in canonical order
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        FEATURE_NAMES
            .iter()
            .map(|&name| (name, self.get(name)))
            .collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_NAMES.len()))?;

        for (name, value) in self.entries() {
            match name {
                "num_corners" => map.serialize_entry(name, &self.num_corners)?,
                "num_defects" => map.serialize_entry(name, &self.num_defects)?,
                _ => map.serialize_entry(name, &value)?,
            }
        }

        map.end()
    }
}

/// Name-based access to shape descriptors
///
/// A `None` return means the descriptor is missing or was not computed.
pub trait Descriptors {
    fn descriptor(&self, name: &str) -> Option<f64>;
}

impl Descriptors for FeatureVector {
    fn descriptor(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

impl<K: Borrow<str> + Hash + Eq> Descriptors for HashMap<K, f64> {
    fn descriptor(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<K: Borrow<str> + Ord> Descriptors for BTreeMap<K, f64> {
    fn descriptor(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Descriptors for serde_json::Map<String, Value> {
    fn descriptor(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }
}

/// Compute the shape descriptors of a contour
///
/// # Arguments
///
/// * `contour` - Ordered closed contour points
/// * `shape` - Shape of the source image, required for the skeleton length
///
/// # Examples
///
/// ```
/// use silhouette_core::im::ImageShape;
/// use silhouette_core::mp::describe;
///
/// let square = [[2, 2], [2, 11], [11, 11], [11, 2]];
/// let shape = ImageShape::new(16, 16).unwrap();
/// let features = describe(&square, Some(&shape));
///
/// assert_eq!(features.area, 81.0);
/// assert_eq!(features.solidity, 1.0);
/// assert_eq!(features.num_corners, 4);
/// assert_eq!(features.num_defects, Some(0));
/// assert_eq!(features.eccentricity, None);
/// assert!(features.skeleton_length.is_some());
/// ```
pub fn describe(contour: &[[i32; 2]], shape: Option<&ImageShape>) -> FeatureVector {
    let area = form::area(contour);
    let perimeter = form::perimeter(contour);
    let area_convex = form::area_convex(contour);

    let num_defects = if contour.len() >= MIN_POINTS_DEFECTS {
        let hull = convex_hull_indices(contour);
        (hull.len() > 3).then(|| convexity_defects(contour, &hull))
    } else {
        None
    };

    let eccentricity =
        (contour.len() >= MIN_POINTS_ELLIPSE).then(|| ellipse_eccentricity(contour));

    let num_corners =
        approximate_polygon(contour, CORNER_EPSILON_FRACTION * perimeter).len() as u32;

    let fourier_1_mag =
        (contour.len() >= MIN_POINTS_FOURIER).then(|| form::fourier_magnitude(contour, 1));

    let skeleton_length = shape.and_then(|shape| {
        skeleton_length(contour, shape.height(), shape.width(), SKELETON_SCALE).ok()
    });

    FeatureVector {
        area,
        perimeter,
        circularity: form::circularity(area, perimeter),
        aspect_ratio: form::aspect_ratio(contour),
        extent: form::extent(area, contour),
        solidity: form::solidity(area, area_convex),
        hu_moments: moments::moments_hu(contour),
        num_defects,
        eccentricity,
        num_corners,
        fourier_1_mag,
        skeleton_length,
    }
}
