// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::io::Write;

use crate::an::{AttributeMap, ObjectRecord};
use crate::error::SilhouetteError;

fn write_error(err: std::io::Error) -> SilhouetteError {
    SilhouetteError::OtherError(format!("Failed to write output. {}", err))
}

/// Write `object_i\tname\tvalue` lines for every descriptor and attribute
///
/// Descriptors that were not computed are written as `null`.
///
/// # Examples
///
/// ```
/// use silhouette_core::an::{ObjectRecord, classify};
/// use silhouette_core::io::write_lines;
/// use silhouette_core::mp::describe;
///
/// let contour = vec![[0, 0], [0, 9], [9, 9], [9, 0]];
/// let features = describe(&contour, None);
/// let record = ObjectRecord::new(0, 0, contour, features, classify(&features));
///
/// let mut buffer = Vec::new();
/// write_lines(&mut buffer, &[record]).unwrap();
///
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.starts_with("object_0\tarea\t81\n"));
/// assert!(text.contains("object_0\teccentricity\tnull\n"));
/// assert!(text.contains("object_0\tcompact\ttrue\n"));
/// ```
pub fn write_lines<W: Write>(writer: &mut W, records: &[ObjectRecord]) -> Result<(), SilhouetteError> {
    for record in records {
        for (name, value) in record.features().entries() {
            let result = match value {
                Some(value) => writeln!(writer, "object_{}\t{}\t{}", record.id(), name, value),
                None => writeln!(writer, "object_{}\t{}\tnull", record.id(), name),
            };
            result.map_err(write_error)?;
        }

        write_attribute_lines(writer, record.id(), record.attributes())?;
    }

    Ok(())
}

/// Write `object_i\tname\tvalue` lines for the attributes of one object
pub fn write_attribute_lines<W: Write>(
    writer: &mut W,
    id: usize,
    attributes: &AttributeMap,
) -> Result<(), SilhouetteError> {
    for (attribute, value) in attributes.entries() {
        writeln!(writer, "object_{}\t{}\t{}", id, attribute, value).map_err(write_error)?;
    }

    Ok(())
}
