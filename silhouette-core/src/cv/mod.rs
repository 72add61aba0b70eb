pub mod contours;
pub mod ellipse;
pub mod hull;
pub mod morphology;
pub mod points;
pub mod simplify;
pub mod skeleton;

pub use contours::{Contour, find_contours, find_external_contours};
pub use hull::{convex_hull, convex_hull_indices, convexity_defects};
