// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::an::PipelineOutput;
use crate::constant::FEATURES_JSON_VALID_KEYS;
use crate::error::SilhouetteError;

#[derive(Serialize)]
struct ImageEntry<'a> {
    image: &'a str,
    #[serde(flatten)]
    output: &'a PipelineOutput,
}

#[derive(Serialize)]
struct ImageBatch<'a> {
    images: Vec<ImageEntry<'a>>,
}

/// Serialize a value as pretty json at the provided path
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> Result<(), SilhouetteError> {
    let file = File::create(path.as_ref()).map_err(|_| {
        SilhouetteError::TableWriteError(format!(
            "Failed to create file: {}",
            path.as_ref().display()
        ))
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .map_err(|err| SilhouetteError::TableWriteError(err.to_string()))
}

/// Write the pipeline output of a single image as `{ "objects": [...], "failures": [...] }`
pub fn write_image_json<P: AsRef<Path>>(
    output: &PipelineOutput,
    path: P,
) -> Result<(), SilhouetteError> {
    write_json(output, path)
}

/// Write pipeline outputs of a batch of images as json
///
/// Batches are always written as
/// `{ "images": [{ "image": ..., "objects": ..., "failures": ... }] }`,
/// including batches holding a single image.
pub fn write_batch_json<S: AsRef<str>, P: AsRef<Path>>(
    batch: &[(S, PipelineOutput)],
    path: P,
) -> Result<(), SilhouetteError> {
    let images = batch
        .iter()
        .map(|(image, output)| ImageEntry {
            image: image.as_ref(),
            output,
        })
        .collect();

    write_json(&ImageBatch { images }, path)
}

/// Parse descriptor maps from a json value
///
/// Accepts an array of objects or an object wrapping the array under one of
/// `features`, `results` or `objects`. Items carrying a nested `features`
/// object, as written by [`write_image_json`], use that object. Batches
/// written by [`write_batch_json`] are flattened in image order.
///
/// # Examples
///
/// ```
/// use silhouette_core::io::parse_features_json;
///
/// let data = serde_json::json!({
///     "objects": [
///         { "id": 0, "features": { "area": 10.0 } },
///         { "area": 4.0, "solidity": 1.0 },
///     ]
/// });
///
/// let features = parse_features_json(&data).unwrap();
///
/// assert_eq!(features.len(), 2);
/// assert_eq!(features[0]["area"], 10.0);
/// assert_eq!(features[1]["solidity"], 1.0);
/// ```
pub fn parse_features_json(data: &Value) -> Result<Vec<Map<String, Value>>, SilhouetteError> {
    if let Some(images) = data.get("images").and_then(Value::as_array) {
        let mut features = Vec::new();
        for image in images.iter() {
            features.extend(parse_features_json(image)?);
        }
        return Ok(features);
    }

    let items = match data {
        Value::Array(items) => items,
        Value::Object(object) => FEATURES_JSON_VALID_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array))
            .ok_or(SilhouetteError::FeaturesReadError)?,
        _ => return Err(SilhouetteError::FeaturesReadError),
    };

    items
        .iter()
        .map(|item| {
            let object = item.as_object().ok_or(SilhouetteError::FeaturesReadError)?;
            match object.get("features").and_then(Value::as_object) {
                Some(features) => Ok(features.clone()),
                None => Ok(object.clone()),
            }
        })
        .collect()
}

/// Read descriptor maps from a json file
pub fn read_features_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Map<String, Value>>, SilhouetteError> {
    let mut contents = String::new();

    File::open(path)
        .map_err(|err| SilhouetteError::NoFileError(err.to_string()))?
        .read_to_string(&mut contents)
        .map_err(|err| SilhouetteError::NoFileError(err.to_string()))?;

    let data: Value =
        serde_json::from_str(&contents).map_err(|_| SilhouetteError::FeaturesReadError)?;

    parse_features_json(&data)
}
