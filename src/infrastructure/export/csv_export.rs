//! Annotated registrar table export.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::{debug, info};

use crate::domain::entities::RegistrarRecord;
use crate::error::AppError;

const HEADERS: [&str; 7] = [
    "id",
    "name",
    "domain_count",
    "rdap_url",
    "rdap_authority",
    "gateway_provider",
    "source_flags",
];

/// Writes the per-registrar table with its classification columns.
pub fn export_records_csv(records: &[RegistrarRecord], path: &Path) -> Result<(), AppError> {
    debug!("Exporting {} registrars to CSV: {}", records.len(), path.display());

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    write_records(records, File::create(path)?)?;

    info!("Exported {} registrars to {}", records.len(), path.display());
    Ok(())
}

/// Writes the table to any writer.
pub fn write_records<W: Write>(records: &[RegistrarRecord], writer: W) -> Result<(), AppError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(HEADERS)?;

    for record in records {
        wtr.write_record([
            record.id.to_string().as_str(),
            record.name.as_str(),
            record
                .domain_count
                .map(|c| c.to_string())
                .unwrap_or_default()
                .as_str(),
            record.rdap_url.as_deref().unwrap_or_default(),
            record.rdap_authority.as_deref().unwrap_or_default(),
            record.category.as_deref().unwrap_or_default(),
            record.source_flags.as_deref().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
