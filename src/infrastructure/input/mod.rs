//! Source table loading.

mod csv_loader;

pub use csv_loader::CsvTableLoader;
