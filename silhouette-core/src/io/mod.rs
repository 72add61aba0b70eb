mod json;
mod table;
mod text;

pub use json::{parse_features_json, read_features_json, write_batch_json, write_image_json, write_json};

pub use table::write_table;
pub use table::write_table_delimited;
pub use table::write_table_pq;
pub use table::{classified_table, records_table};

pub use text::{write_attribute_lines, write_lines};
