//! Registrar directory implementations.
//!
//! - [`JsonFileDirectory`] - snapshot of registrar contacts loaded from a JSON file
//! - [`NullDirectory`] - no-op directory for runs without enrichment data

mod json_file_directory;
mod null_directory;

pub use json_file_directory::JsonFileDirectory;
pub use null_directory::NullDirectory;
