// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use serde_json::{Map, Value};

use crate::an::{AttributeMap, PipelineOutput};
use crate::constant::{ATTRIBUTE_NAMES, FEATURE_NAMES};
use crate::error::SilhouetteError;
use crate::mp::Descriptors;

fn table_error(err: PolarsError) -> SilhouetteError {
    SilhouetteError::TableWriteError(err.to_string())
}

fn descriptor_columns(values: Vec<Vec<Option<f64>>>) -> impl Iterator<Item = Column> {
    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, values)| Column::new((*name).into(), values))
}

fn attribute_columns(values: Vec<Vec<bool>>) -> impl Iterator<Item = Column> {
    ATTRIBUTE_NAMES
        .iter()
        .zip(values)
        .map(|(name, values)| Column::new((*name).into(), values))
}

/// Build a table with one row per object across a batch of images
///
/// Columns are `image`, `object`, `segment`, every descriptor (null when not
/// computed) and every attribute as a boolean.
///
/// # Examples
///
/// ```
/// use silhouette_core::an::{Pipeline, PipelineOptions};
/// use silhouette_core::im::{ImageShape, Segment};
/// use silhouette_core::io::records_table;
///
/// let shape = ImageShape::new(16, 16).unwrap();
/// let segments = vec![Segment::Polygon(vec![[2, 2], [12, 2], [12, 12], [2, 12]])];
/// let output = Pipeline::new(PipelineOptions::default()).unwrap().run(&shape, &segments);
///
/// let df = records_table(&[("image_1", output)]).unwrap();
///
/// assert_eq!(df.height(), 1);
/// assert_eq!(df.width(), 3 + 18 + 7);
/// ```
pub fn records_table<S: AsRef<str>>(
    batch: &[(S, PipelineOutput)],
) -> Result<DataFrame, SilhouetteError> {
    let n: usize = batch.iter().map(|(_, output)| output.len()).sum();

    let mut image: Vec<String> = Vec::with_capacity(n);
    let mut object: Vec<u32> = Vec::with_capacity(n);
    let mut segment: Vec<u32> = Vec::with_capacity(n);
    let mut descriptors: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(n); FEATURE_NAMES.len()];
    let mut attributes: Vec<Vec<bool>> = vec![Vec::with_capacity(n); ATTRIBUTE_NAMES.len()];

    for (name, output) in batch {
        for record in output.records.iter() {
            image.push(name.as_ref().to_string());
            object.push(record.id() as u32);
            segment.push(record.segment() as u32);

            for (column, (_, value)) in descriptors.iter_mut().zip(record.features().entries()) {
                column.push(value);
            }

            for (column, (_, value)) in attributes.iter_mut().zip(record.attributes().entries()) {
                column.push(value);
            }
        }
    }

    let mut columns = vec![
        Column::new("image".into(), image),
        Column::new("object".into(), object),
        Column::new("segment".into(), segment),
    ];

    columns.extend(descriptor_columns(descriptors));
    columns.extend(attribute_columns(attributes));

    DataFrame::new(columns).map_err(table_error)
}

/// Build a table of externally supplied descriptors and their attributes
pub fn classified_table(
    features: &[Map<String, Value>],
    attributes: &[AttributeMap],
) -> Result<DataFrame, SilhouetteError> {
    if features.len() != attributes.len() {
        return Err(SilhouetteError::TableWriteError(
            "Number of feature rows and attribute rows must match.".to_string(),
        ));
    }

    let object: Vec<u32> = (0..features.len() as u32).collect();

    let descriptors: Vec<Vec<Option<f64>>> = FEATURE_NAMES
        .iter()
        .map(|name| features.iter().map(|row| row.descriptor(name)).collect())
        .collect();

    let mut decisions: Vec<Vec<bool>> = vec![Vec::with_capacity(attributes.len()); ATTRIBUTE_NAMES.len()];
    for row in attributes {
        for (column, (_, value)) in decisions.iter_mut().zip(row.entries()) {
            column.push(value);
        }
    }

    let mut columns = vec![Column::new("object".into(), object)];
    columns.extend(descriptor_columns(descriptors));
    columns.extend(attribute_columns(decisions));

    DataFrame::new(columns).map_err(table_error)
}

fn create_file(path: &Path) -> Result<File, SilhouetteError> {
    File::create(path).map_err(|_| {
        SilhouetteError::TableWriteError(format!("Failed to create file: {}", path.display()))
    })
}

/// Write a table to a delimited text file
pub fn write_table_delimited<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    separator: u8,
) -> Result<(), SilhouetteError> {
    let mut output = create_file(path.as_ref())?;

    CsvWriter::new(&mut output)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
        .map_err(table_error)
}

/// Write a table to a parquet file
pub fn write_table_pq<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SilhouetteError> {
    let mut output = create_file(path.as_ref())?;

    ParquetWriter::new(&mut output)
        .finish(df)
        .map(|_| ())
        .map_err(table_error)
}

/// Write a DataFrame to disk with a format chosen by file extension
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use silhouette_core::io::write_table;
///
/// let column = vec![Column::new("area".into(), [2.5, 3.1, 3.4])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table(&mut df, "output.csv").unwrap()
/// ```
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SilhouetteError> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("csv") => write_table_delimited(df, path, b','),
        Some("tsv") | Some("txt") => write_table_delimited(df, path, b'\t'),
        Some("pq") | Some("parquet") => write_table_pq(df, path),
        _ => Err(SilhouetteError::TableWriteError(
            "Table path must end with one of: csv, tsv, txt, parquet, or pq.".to_string(),
        )),
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::an::{Pipeline, PipelineOptions, classify};
    use crate::im::{ImageShape, Segment};

    fn batch() -> Vec<(String, PipelineOutput)> {
        let shape = ImageShape::new(24, 24).unwrap();
        let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();

        let a = pipeline.run(
            &shape,
            &[
                Segment::Polygon(vec![[1, 1], [8, 1], [8, 8], [1, 8]]),
                Segment::Polygon(vec![[12, 12], [20, 12], [16, 20]]),
            ],
        );

        let b = pipeline.run(&shape, &[Segment::Polygon(vec![[3, 3], [3, 15], [15, 15]])]);

        vec![("a".to_string(), a), ("b".to_string(), b)]
    }

    #[test]
    fn test_records_table() {
        let df = records_table(&batch()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3 + FEATURE_NAMES.len() + ATTRIBUTE_NAMES.len());
        assert_eq!(df.get_column_names()[3].as_str(), "area");

        // Four point contours have no eccentricity
        assert!(df.column("eccentricity").unwrap().null_count() >= 1);
        assert_eq!(df.column("area").unwrap().null_count(), 0);
    }

    #[test]
    fn test_classified_table() {
        let rows: Vec<Map<String, Value>> = vec![
            serde_json::json!({ "solidity": 0.9, "extent": 0.9 }),
            serde_json::json!({ "area": 12.0 }),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();

        let attributes: Vec<AttributeMap> = rows.iter().map(|r| classify(r)).collect();
        let df = classified_table(&rows, &attributes).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("solidity").unwrap().null_count(), 1);
        assert!(classified_table(&rows, &attributes[..1]).is_err());
    }

    #[test]
    fn test_write_table_formats() {
        let mut df = records_table(&batch()).unwrap();
        let base = std::env::temp_dir().join(format!("silhouette_table_{}", std::process::id()));

        let csv = base.with_extension("csv");
        write_table(&mut df, &csv).unwrap();
        let contents = std::fs::read_to_string(&csv).unwrap();
        assert!(contents.starts_with("image,object,segment,area,perimeter"));
        assert_eq!(contents.lines().count(), 4);

        let tsv = base.with_extension("tsv");
        write_table(&mut df, &tsv).unwrap();
        assert!(std::fs::read_to_string(&tsv).unwrap().starts_with("image\tobject"));

        let pq = base.with_extension("pq");
        write_table(&mut df, &pq).unwrap();
        assert!(pq.is_file());

        assert!(write_table(&mut df, base.with_extension("xlsx")).is_err());

        for path in [csv, tsv, pq] {
            std::fs::remove_file(path).unwrap();
        }
    }
}
