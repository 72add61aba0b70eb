pub mod path;
pub mod timer;
pub mod track;
