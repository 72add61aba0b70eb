// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeSet;
use std::path::Path;

use image::{DynamicImage, open as open_dynamic};
use npyz::{DType, NpyFile, TypeChar};

use crate::constant;
use crate::cv::morphology;
use crate::cv::points::fill_polygon_mut;
use crate::error::SilhouetteError;
use crate::im::{ImageShape, Segment};

/// A row-major binary mask with values exactly 0 or 1
///
/// # Examples
///
/// ```
/// use silhouette_core::im::Mask;
///
/// let mask = Mask::new(3, 2, vec![0, 255, 0, 7, 0, 1]).unwrap();
///
/// assert_eq!(mask.as_raw(), &[0, 1, 0, 1, 0, 1]);
/// assert_eq!(mask.count_nonzero(), 3);
/// ```
///
/// ```
/// use silhouette_core::im::Mask;
///
/// let mask = Mask::new(3, 3, vec![0u8; 4]);
/// assert!(mask.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Mask {
    /// Create a new mask, setting any non-zero value to 1
    pub fn new(width: u32, height: u32, buffer: Vec<u8>) -> Result<Mask, SilhouetteError> {
        if buffer.len() != (width as usize) * (height as usize) {
            return Err(SilhouetteError::BufferSizeError);
        }

        let buffer = buffer.into_iter().map(|v| u8::from(v != 0)).collect();

        Ok(Mask {
            width,
            height,
            buffer,
        })
    }

    /// Create an all-background mask
    pub fn zeros(width: u32, height: u32) -> Mask {
        Mask {
            width,
            height,
            buffer: vec![0u8; (width as usize) * (height as usize)],
        }
    }

    /// Rasterize a polygon, filling its interior and boundary with 1
    ///
    /// # Examples
    ///
    /// ```
    /// use silhouette_core::im::Mask;
    ///
    /// let mask = Mask::from_polygon(4, 4, &[[0, 0], [2, 0], [2, 2], [0, 2]]).unwrap();
    /// assert_eq!(mask.count_nonzero(), 9);
    /// ```
    pub fn from_polygon(
        width: u32,
        height: u32,
        points: &[[i32; 2]],
    ) -> Result<Mask, SilhouetteError> {
        if points.is_empty() {
            return Err(SilhouetteError::PolygonError("Polygon has no vertices."));
        }

        let mut mask = Mask::zeros(width, height);
        fill_polygon_mut(&mut mask.buffer, width, height, points, 1);

        Ok(mask)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.buffer
    }

    pub fn count_nonzero(&self) -> usize {
        self.buffer.iter().filter(|&&v| v != 0).count()
    }

    /// Morphologically close the mask with an elliptical structuring element
    pub fn close(&self, size: u32) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            buffer: morphology::close(&self.buffer, self.width, self.height, size),
        }
    }
}

// >>> I/O METHODS

/// Integer labels read from a mask file prior to binarization
struct LabelBuffer {
    width: u32,
    height: u32,
    labels: Vec<u32>,
}

impl LabelBuffer {
    fn open<P: AsRef<Path>>(path: P) -> Result<LabelBuffer, SilhouetteError> {
        if !path.as_ref().exists() {
            return Err(SilhouetteError::NoFileError(
                path.as_ref().display().to_string(),
            ));
        }

        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                let bytes = std::fs::read(&path).map_err(|_| SilhouetteError::MaskReadError)?;
                let npy = NpyFile::new(&bytes[..]).map_err(|_| SilhouetteError::MaskReadError)?;
                return Self::from_numpy(npy);
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                let image = open_dynamic(&path).map_err(|_| SilhouetteError::MaskReadError)?;
                return Self::from_dynamic(image);
            }
        }

        Err(SilhouetteError::ImageExtensionError)
    }

    fn from_dynamic(mask: DynamicImage) -> Result<LabelBuffer, SilhouetteError> {
        let width = mask.width();
        let height = mask.height();

        let labels: Vec<u32> = match mask {
            DynamicImage::ImageLuma8(buffer) => {
                buffer.into_raw().into_iter().map(|p| p as u32).collect()
            }
            DynamicImage::ImageLumaA8(buffer) => buffer
                .into_raw()
                .chunks_exact(2)
                .map(|p| p[0] as u32)
                .collect(),
            DynamicImage::ImageLuma16(buffer) => {
                buffer.into_raw().into_iter().map(|p| p as u32).collect()
            }
            DynamicImage::ImageLumaA16(buffer) => buffer
                .into_raw()
                .chunks_exact(2)
                .map(|p| p[0] as u32)
                .collect(),
            _ => return Err(SilhouetteError::MaskFormatError),
        };

        Ok(LabelBuffer {
            width,
            height,
            labels,
        })
    }

    fn from_numpy(npy: NpyFile<&[u8]>) -> Result<LabelBuffer, SilhouetteError> {
        let shape = npy.shape().to_vec();

        let (height, width) = match shape.len() {
            2 => (shape[0] as u32, shape[1] as u32),
            3 if shape[2] == 1 => (shape[0] as u32, shape[1] as u32),
            3 => return Err(SilhouetteError::MaskFormatError),
            _ => {
                return Err(SilhouetteError::MaskError(
                    "Numpy array masks must have an (H, W) shape.",
                ));
            }
        };

        let labels: Vec<u32> = match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => npy
                    .into_vec::<u8>()
                    .map_err(|_| SilhouetteError::MaskReadError)?
                    .into_iter()
                    .map(|p| p as u32)
                    .collect(),
                (TypeChar::Uint, 2) => npy
                    .into_vec::<u16>()
                    .map_err(|_| SilhouetteError::MaskReadError)?
                    .into_iter()
                    .map(|p| p as u32)
                    .collect(),
                (TypeChar::Uint, 4) => npy
                    .into_vec::<u32>()
                    .map_err(|_| SilhouetteError::MaskReadError)?,
                _ => return Err(SilhouetteError::MaskFormatError),
            },
            _ => {
                return Err(SilhouetteError::MaskError(
                    "Only plain numpy mask arrays are currently supported.",
                ));
            }
        };

        if labels.len() != (width as usize) * (height as usize) {
            return Err(SilhouetteError::BufferSizeError);
        }

        Ok(LabelBuffer {
            width,
            height,
            labels,
        })
    }
}

impl Mask {
    /// Open a mask from a provided path, treating any non-zero pixel as foreground
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image or numpy array with a valid extension
    ///
    /// ```no_run
    /// use silhouette_core::im::Mask;
    /// let mask = Mask::open("mask.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Mask, SilhouetteError> {
        let buffer = LabelBuffer::open(path)?;
        Mask::new(
            buffer.width,
            buffer.height,
            buffer.labels.into_iter().map(|v| u8::from(v != 0)).collect(),
        )
    }

    /// Open a mask and split it into one binary mask per unique non-zero label
    ///
    /// Binary masks (a single non-zero value) yield one mask. Masks are
    /// returned in ascending label order together with their label.
    ///
    /// ```no_run
    /// use silhouette_core::im::Mask;
    /// let masks = Mask::open_labeled("labels.npy").unwrap();
    /// ```
    pub fn open_labeled<P: AsRef<Path>>(path: P) -> Result<Vec<(u32, Mask)>, SilhouetteError> {
        let buffer = LabelBuffer::open(path)?;
        Ok(split_labels(buffer.width, buffer.height, &buffer.labels))
    }

    /// Open a mask file as pipeline segments along with its image shape
    ///
    /// Each unique non-zero label becomes one segment, so an all-zero mask
    /// yields a valid shape and no segments.
    ///
    /// ```no_run
    /// use silhouette_core::im::Mask;
    /// let (shape, segments) = Mask::open_segments("labels.png").unwrap();
    /// ```
    pub fn open_segments<P: AsRef<Path>>(
        path: P,
    ) -> Result<(ImageShape, Vec<Segment>), SilhouetteError> {
        let buffer = LabelBuffer::open(path)?;
        let shape = ImageShape::new(buffer.height, buffer.width)?;

        let segments = split_labels(buffer.width, buffer.height, &buffer.labels)
            .into_iter()
            .map(|(_, mask)| Segment::Mask(mask))
            .collect();

        Ok((shape, segments))
    }
}

// <<< I/O METHODS

/// Split an integer-labeled buffer into one binary mask per non-zero label
///
/// # Examples
///
/// ```
/// use silhouette_core::im::split_labels;
///
/// let masks = split_labels(3, 1, &[2, 0, 5]);
///
/// assert_eq!(masks.len(), 2);
/// assert_eq!(masks[0].0, 2);
/// assert_eq!(masks[1].1.as_raw(), &[0, 0, 1]);
/// ```
pub fn split_labels(width: u32, height: u32, labels: &[u32]) -> Vec<(u32, Mask)> {
    let unique: BTreeSet<u32> = labels.iter().filter(|&&v| v != 0).cloned().collect();

    unique
        .into_iter()
        .map(|label| {
            let buffer = labels.iter().map(|&v| u8::from(v == label)).collect();
            (
                label,
                Mask {
                    width,
                    height,
                    buffer,
                },
            )
        })
        .collect()
}
