// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use serde_json::Value;

use crate::constant::{POLYGON_JSON_VALID_KEYS, SHAPE_JSON_VALID_KEYS};
use crate::error::SilhouetteError;
use crate::im::{ImageShape, Segment};

/// A polygon container for storing object outlines with an optional image shape
///
/// The polygons are stored in (N, K, 2) format where N is the number of
/// polygons for a given image and K specifies the number of integer (x, y)
/// points in each polygon. The polygons can be ragged so K can vary.
///
/// # Examples
///
/// ```
/// use silhouette_core::im::{ImageShape, Polygons};
///
/// let data = vec![
///     vec![[0, 1], [1, 1], [1, 2], [0, 2]],
///     vec![[1, 1], [2, 1], [2, 2]],
/// ];
///
/// let polygons = Polygons::new(data, ImageShape::new(4, 4).ok());
///
/// assert_eq!(polygons.len(), 2);
/// assert_eq!(polygons.to_segments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polygons {
    data: Vec<Vec<[i32; 2]>>,
    shape: Option<ImageShape>,
}

impl Polygons {
    pub fn new(data: Vec<Vec<[i32; 2]>>, shape: Option<ImageShape>) -> Self {
        Self { data, shape }
    }

    /// Return the number of stored polygons
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no stored polygons
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the image shape stored alongside the polygons
    pub fn shape(&self) -> Option<ImageShape> {
        self.shape
    }

    /// Return a reference to the underlying polygon points
    pub fn as_points(&self) -> &[Vec<[i32; 2]>] {
        &self.data
    }

    /// Convert the polygons into pipeline segments
    pub fn to_segments(&self) -> Vec<Segment> {
        self.data.iter().cloned().map(Segment::Polygon).collect()
    }
}

// >>> I/O METHODS

impl Polygons {
    /// Open polygons from the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to polygons with a valid extension
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use silhouette_core::im::Polygons;
    /// let polygons = Polygons::open("polygons.json");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Polygons, SilhouetteError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "json" {
                return read_polygons_json(path);
            }
        }

        Err(SilhouetteError::PolygonsReadError)
    }

    /// Save polygons and shape at the provided path
    ///
    /// ```no_run
    /// use silhouette_core::im::Polygons;
    /// let polygons = Polygons::open("polygons.json").unwrap();
    /// polygons.save("copy.json").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SilhouetteError> {
        let file = File::create(path).map_err(|err| SilhouetteError::OtherError(err.to_string()))?;
        let writer = BufWriter::new(file);

        let value = match self.shape {
            Some(shape) => serde_json::json!({ "polygons": self.data, "input_shape": shape }),
            None => serde_json::json!({ "polygons": self.data }),
        };

        serde_json::to_writer(writer, &value)
            .map_err(|err| SilhouetteError::OtherError(err.to_string()))
    }
}

// <<< I/O METHODS

fn to_i32(value: &Value) -> Result<i32, SilhouetteError> {
    if let Some(n) = value.as_i64() {
        i32::try_from(n).map_err(|_| SilhouetteError::PolygonsReadError)
    } else if let Some(n) = value.as_f64() {
        let n = n.round();
        if n.is_finite() && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
            Ok(n as i32)
        } else {
            Err(SilhouetteError::PolygonsReadError)
        }
    } else {
        Err(SilhouetteError::PolygonsReadError)
    }
}

/// Parse polygons and an optional image shape from a json value
pub fn parse_polygons_json(data: &Value) -> Result<Polygons, SilhouetteError> {
    let shape = SHAPE_JSON_VALID_KEYS
        .iter()
        .find_map(|key| data.get(key).and_then(|v| v.as_array()))
        .map(|dims| {
            let dims: Option<Vec<u32>> = dims.iter().map(|d| d.as_u64().map(|d| d as u32)).collect();
            dims.ok_or(SilhouetteError::ShapeError)
                .and_then(|dims| ImageShape::from_dims(&dims))
        })
        .transpose()?;

    for key in &POLYGON_JSON_VALID_KEYS {
        if let Some(polygons) = data.get(key).and_then(|v| v.as_array()) {
            let polygons: Vec<Vec<[i32; 2]>> = polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .as_array()
                        .ok_or(SilhouetteError::PolygonsReadError)?
                        .iter()
                        .map(|p| match p.as_array() {
                            Some(p) if p.len() == 2 => Ok([to_i32(&p[0])?, to_i32(&p[1])?]),
                            _ => Err(SilhouetteError::PolygonsReadError),
                        })
                        .collect::<Result<Vec<[i32; 2]>, _>>()
                })
                .collect::<Result<_, _>>()?;

            return Ok(Polygons::new(polygons, shape));
        }
    }

    Err(SilhouetteError::PolygonsReadError)
}

/// Read polygons from a json file
pub fn read_polygons_json<P: AsRef<Path>>(path: P) -> Result<Polygons, SilhouetteError> {
    let mut contents = String::new();

    File::open(path)
        .map_err(|err| SilhouetteError::NoFileError(err.to_string()))?
        .read_to_string(&mut contents)
        .map_err(|err| SilhouetteError::NoFileError(err.to_string()))?;

    let data: Value =
        serde_json::from_str(&contents).map_err(|_| SilhouetteError::PolygonsReadError)?;

    parse_polygons_json(&data)
}
