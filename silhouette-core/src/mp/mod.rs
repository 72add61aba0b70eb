pub mod features;
pub mod form;
pub mod moments;

pub use features::{Descriptors, FeatureVector, describe};
