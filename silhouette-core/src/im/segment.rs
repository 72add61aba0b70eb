// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::constant::MORPHOLOGY_KERNEL_SIZE;
use crate::error::SilhouetteError;
use crate::im::Mask;

/// The (height, width[, channels]) shape of an image
///
/// # Examples
///
/// ```
/// use silhouette_core::im::ImageShape;
///
/// let shape = ImageShape::from_dims(&[480, 640, 3]).unwrap();
///
/// assert_eq!(shape.height(), 480);
/// assert_eq!(shape.width(), 640);
/// assert_eq!(shape.channels(), Some(3));
///
/// assert!(ImageShape::from_dims(&[480]).is_err());
/// assert!(ImageShape::from_dims(&[0, 640]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    height: u32,
    width: u32,
    channels: Option<u32>,
}

impl ImageShape {
    pub fn new(height: u32, width: u32) -> Result<ImageShape, SilhouetteError> {
        if height == 0 || width == 0 {
            return Err(SilhouetteError::ShapeError);
        }

        Ok(ImageShape {
            height,
            width,
            channels: None,
        })
    }

    pub fn with_channels(
        height: u32,
        width: u32,
        channels: u32,
    ) -> Result<ImageShape, SilhouetteError> {
        if channels == 0 {
            return Err(SilhouetteError::ShapeError);
        }

        let mut shape = ImageShape::new(height, width)?;
        shape.channels = Some(channels);

        Ok(shape)
    }

    /// Build a shape from `[h, w]` or `[h, w, c]` dimensions
    pub fn from_dims(dims: &[u32]) -> Result<ImageShape, SilhouetteError> {
        match dims {
            [h, w] => ImageShape::new(*h, *w),
            [h, w, c] => ImageShape::with_channels(*h, *w, *c),
            _ => Err(SilhouetteError::ShapeError),
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn channels(&self) -> Option<u32> {
        self.channels
    }

    pub fn to_vec(&self) -> Vec<u32> {
        match self.channels {
            Some(c) => vec![self.height, self.width, c],
            None => vec![self.height, self.width],
        }
    }
}

impl Serialize for ImageShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_vec())
    }
}

/// A candidate object region provided by an upstream detector
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A binary mask aligned to the image
    Mask(Mask),
    /// Ordered integer (x, y) polygon vertices
    Polygon(Vec<[i32; 2]>),
}

impl From<Mask> for Segment {
    fn from(mask: Mask) -> Self {
        Segment::Mask(mask)
    }
}

impl From<Vec<[i32; 2]>> for Segment {
    fn from(points: Vec<[i32; 2]>) -> Self {
        Segment::Polygon(points)
    }
}

/// Convert a single segment into a canonical binary mask
///
/// # Arguments
///
/// * `shape` - Shape of the image the segment belongs to
/// * `segment` - A mask or polygon segment
/// * `apply_morphology` - Close the mask with a 3x3 elliptical element
///
/// # Examples
///
/// ```
/// use silhouette_core::im::{ImageShape, Segment, normalize_segment};
///
/// let shape = ImageShape::new(7, 7).unwrap();
/// let segment = Segment::Polygon(vec![[2, 2], [4, 2], [4, 4], [2, 4]]);
/// let mask = normalize_segment(&shape, &segment, true).unwrap();
///
/// assert_eq!(mask.count_nonzero(), 9);
/// ```
pub fn normalize_segment(
    shape: &ImageShape,
    segment: &Segment,
    apply_morphology: bool,
) -> Result<Mask, SilhouetteError> {
    let mask = match segment {
        Segment::Polygon(points) => Mask::from_polygon(shape.width(), shape.height(), points)?,
        Segment::Mask(mask) => {
            if mask.width() != shape.width() || mask.height() != shape.height() {
                return Err(SilhouetteError::MaskShapeError {
                    expected: (shape.height(), shape.width()),
                    found: (mask.height(), mask.width()),
                });
            }
            mask.clone()
        }
    };

    if apply_morphology {
        Ok(mask.close(MORPHOLOGY_KERNEL_SIZE))
    } else {
        Ok(mask)
    }
}

/// Normalize independent segments in parallel, preserving input order
///
/// Each segment succeeds or fails on its own. Parallel work runs on the
/// rayon pool the call is made from.
pub fn normalize(
    shape: &ImageShape,
    segments: &[Segment],
    apply_morphology: bool,
) -> Vec<Result<Mask, SilhouetteError>> {
    segments
        .par_iter()
        .map(|segment| normalize_segment(shape, segment, apply_morphology))
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_shape_serialize() {
        let shape = ImageShape::new(4, 6).unwrap();
        assert_eq!(serde_json::to_string(&shape).unwrap(), "[4,6]");

        let shape = ImageShape::with_channels(4, 6, 3).unwrap();
        assert_eq!(serde_json::to_string(&shape).unwrap(), "[4,6,3]");
    }

    #[test]
    fn test_mask_passthrough() {
        let shape = ImageShape::new(2, 3).unwrap();
        let mask = Mask::new(3, 2, vec![0, 9, 0, 0, 0, 1]).unwrap();

        let normalized = normalize_segment(&shape, &Segment::Mask(mask.clone()), false).unwrap();
        assert_eq!(normalized, mask);
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let shape = ImageShape::new(4, 4).unwrap();
        let segment = Segment::Mask(Mask::zeros(3, 4));

        let result = normalize_segment(&shape, &segment, true);
        assert_eq!(
            result,
            Err(SilhouetteError::MaskShapeError {
                expected: (4, 4),
                found: (4, 3),
            })
        );
    }

    #[test]
    fn test_all_zero_segment() {
        let shape = ImageShape::new(8, 8).unwrap();
        let segment = Segment::Mask(Mask::zeros(8, 8));

        let mask = normalize_segment(&shape, &segment, true).unwrap();
        assert_eq!(mask.count_nonzero(), 0);
    }

    #[test]
    fn test_morphology_fills_speckle() {
        let shape = ImageShape::new(5, 5).unwrap();

        let mut buffer = vec![1u8; 25];
        buffer[12] = 0;
        let segment = Segment::Mask(Mask::new(5, 5, buffer).unwrap());

        let raw = normalize_segment(&shape, &segment, false).unwrap();
        let closed = normalize_segment(&shape, &segment, true).unwrap();

        assert_eq!(raw.count_nonzero(), 24);
        assert_eq!(closed.count_nonzero(), 25);
    }

    #[test]
    fn test_normalize_order_and_isolation() {
        let shape = ImageShape::new(6, 6).unwrap();
        let segments = vec![
            Segment::Polygon(vec![[0, 0], [1, 0], [1, 1], [0, 1]]),
            Segment::Mask(Mask::zeros(2, 2)),
            Segment::Polygon(vec![]),
            Segment::Polygon(vec![[2, 2], [5, 2], [5, 5], [2, 5]]),
        ];

        let masks = normalize(&shape, &segments, true);

        assert_eq!(masks.len(), 4);
        assert_eq!(masks[0].as_ref().unwrap().count_nonzero(), 4);
        assert!(masks[1].is_err());
        assert!(masks[2].is_err());
        assert_eq!(masks[3].as_ref().unwrap().count_nonzero(), 16);
    }
}
