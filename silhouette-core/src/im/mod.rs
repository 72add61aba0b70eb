mod mask;
mod polygons;
mod segment;

pub use mask::Mask;
pub use mask::split_labels;

pub use polygons::Polygons;
pub use polygons::{parse_polygons_json, read_polygons_json};

pub use segment::ImageShape;
pub use segment::Segment;
pub use segment::{normalize, normalize_segment};
