// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SilhouetteError {
    ShapeError,
    BufferSizeError,
    MaskError(&'static str),
    MaskShapeError {
        expected: (u32, u32),
        found: (u32, u32),
    },
    MaskReadError,
    MaskFormatError,
    ImageExtensionError,
    PolygonError(&'static str),
    PolygonsReadError,
    FeaturesReadError,
    NoFileError(String),
    DirError(String),
    ThreadPoolError(String),
    TableWriteError(String),
    OtherError(String),
}

impl fmt::Display for SilhouetteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SilhouetteError::ShapeError => {
                write!(
                    f,
                    "[silhouette::ShapeError] Image shape must be (height, width) or (height, width, channels) with non-zero dimensions."
                )
            }
            SilhouetteError::BufferSizeError => {
                write!(
                    f,
                    "[silhouette::BufferSizeError] The buffer does not match provided size."
                )
            }
            SilhouetteError::MaskError(message) => {
                write!(f, "[silhouette::MaskError] Failed to create mask. {}", message)
            }
            SilhouetteError::MaskShapeError { expected, found } => {
                write!(
                    f,
                    "[silhouette::MaskShapeError] Mask shape (h={}, w={}) does not match image shape (h={}, w={}).",
                    found.0, found.1, expected.0, expected.1
                )
            }
            SilhouetteError::MaskReadError => {
                write!(f, "[silhouette::MaskReadError] Failed to read mask.")
            }
            SilhouetteError::MaskFormatError => {
                write!(
                    f,
                    "[silhouette::MaskFormatError] Only 1-channel u8, u16 and u32 masks are currently supported."
                )
            }
            SilhouetteError::ImageExtensionError => {
                write!(
                    f,
                    "[silhouette::ImageExtensionError] Could not detect a valid extension for input."
                )
            }
            SilhouetteError::PolygonError(message) => {
                write!(f, "[silhouette::PolygonError] Invalid polygon. {}", message)
            }
            SilhouetteError::PolygonsReadError => {
                write!(
                    f,
                    "[silhouette::PolygonsReadError] Polygons could not be read."
                )
            }
            SilhouetteError::FeaturesReadError => {
                write!(
                    f,
                    "[silhouette::FeaturesReadError] Feature records could not be read."
                )
            }
            SilhouetteError::NoFileError(message) => {
                write!(
                    f,
                    "[silhouette::NoFileError] File could not be found. {}.",
                    message
                )
            }
            SilhouetteError::DirError(message) => {
                write!(
                    f,
                    "[silhouette::DirError] Directory could not be read. {}.",
                    message
                )
            }
            SilhouetteError::ThreadPoolError(message) => {
                write!(
                    f,
                    "[silhouette::ThreadPoolError] Failed to build worker pool. {}.",
                    message
                )
            }
            SilhouetteError::TableWriteError(message) => {
                write!(
                    f,
                    "[silhouette::TableWriteError] Failed to write table. {}.",
                    message
                )
            }
            SilhouetteError::OtherError(message) => {
                write!(f, "[silhouette::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for SilhouetteError {}
