//! Output writers for reports, candidate lists and annotated tables.

mod csv_export;
mod json_export;

pub use csv_export::{export_records_csv, write_records};
pub use json_export::{AnalysisDocument, read_snapshot, write_json};
