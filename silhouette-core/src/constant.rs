// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// All currently supported mask formats
pub const SUPPORTED_MASK_FORMATS: [&str; 12] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "qoi", "tif", "tiff", "webp", "npy",
];

// The currently supported common image formats read through image-rs
pub const IMAGE_DYNAMIC_FORMATS: [&str; 11] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "qoi", "tif", "tiff", "webp",
];

// All currently supported array formats
pub const SUPPORTED_ARRAY_FORMATS: [&str; 1] = ["json"];

// All currently supported table formats
pub const SUPPORTED_TABLE_FORMATS: [&str; 6] = ["csv", "tsv", "txt", "pq", "parquet", "json"];

// The valid json keys indicating polygon values
pub const POLYGON_JSON_VALID_KEYS: [&str; 5] =
    ["polygons", "contours", "outlines", "shapes", "points"];

// The valid json keys indicating the (height, width[, channels]) image shape
pub const SHAPE_JSON_VALID_KEYS: [&str; 3] = ["input_shape", "image_shape", "shape"];

// The valid json keys wrapping a list of feature records
pub const FEATURES_JSON_VALID_KEYS: [&str; 3] = ["features", "results", "objects"];

// Side length of the elliptical structuring element used when closing masks
pub const MORPHOLOGY_KERNEL_SIZE: u32 = 3;

// Downsampling applied to filled contours before skeletonization
pub const SKELETON_SCALE: f64 = 0.15;

// Douglas-Peucker tolerance as a fraction of the contour perimeter
pub const CORNER_EPSILON_FRACTION: f64 = 0.01;

// Minimum number of contour points for each conditional descriptor
pub const MIN_POINTS_DEFECTS: usize = 4;
pub const MIN_POINTS_ELLIPSE: usize = 5;
pub const MIN_POINTS_FOURIER: usize = 2;

// Points are resampled to at least this count before fitting an ellipse
pub const ELLIPSE_RESAMPLE_POINTS: usize = 32;

// Corner counts that characterize regular man-made outlines
pub const MANMADE_CORNERS: [u32; 6] = [3, 4, 6, 8, 10, 12];

// Corner counts that characterize compact boxes and bricks
pub const COMPACT_CORNERS: [u32; 2] = [4, 6];

// Names for shape descriptors
pub const FEATURE_NAMES: [&str; 18] = [
    "area",
    "perimeter",
    "circularity",
    "aspect_ratio",
    "extent",
    "solidity",
    "hu_moment_1",
    "hu_moment_2",
    "hu_moment_3",
    "hu_moment_4",
    "hu_moment_5",
    "hu_moment_6",
    "hu_moment_7",
    "num_defects",
    "eccentricity",
    "num_corners",
    "fourier_1_mag",
    "skeleton_length",
];

// Names for derived boolean attributes in evaluation order
pub const ATTRIBUTE_NAMES: [&str; 7] = [
    "manmade",
    "fractured",
    "long",
    "round",
    "compact",
    "long_skeleton",
    "rigid",
];
