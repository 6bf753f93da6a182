//! Data structures and I/O for raw records and prepared datasets

pub mod dataset;
pub mod loader;
pub mod table;

pub use dataset::Dataset;
pub use loader::{load_table, save_predictions, IngestionError};
pub use table::{RawTable, Value};
