pub mod csv;

pub use csv::{parse_csv, serialize_csv};
