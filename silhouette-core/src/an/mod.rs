pub mod attributes;
pub mod pipeline;
pub mod record;

pub use attributes::{Attribute, AttributeMap, RuleInputs, classify};
pub use pipeline::{Pipeline, PipelineOptions, PipelineOutput, SegmentFailure};
pub use record::ObjectRecord;
