pub mod classify;
pub mod measure;
