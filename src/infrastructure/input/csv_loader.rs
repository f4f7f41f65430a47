//! CSV loader for the registrar table.
//!
//! Source spreadsheets use inconsistent headers ("IANA ID", "Domain count",
//! "rdap_url", ...). Headers are matched case-insensitively with spaces,
//! underscores and hyphens treated alike.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::domain::entities::RegistrarRecord;
use crate::error::AppError;

const ID_COLUMNS: &[&str] = &["iana id", "registrar id", "id", "iana"];
const NAME_COLUMNS: &[&str] = &["name", "registrar name", "registrar"];
const DOMAIN_COUNT_COLUMNS: &[&str] = &["domain count", "domains", "total domains"];
const RDAP_COLUMNS: &[&str] = &["rdap url", "rdap", "rdap base url", "rdap endpoint"];
const FLAG_COLUMNS: &[&str] = &["category", "duplicate", "flags"];

/// Resolved column positions.
#[derive(Debug)]
struct ColumnMap {
    id: usize,
    name: usize,
    domain_count: Option<usize>,
    rdap_url: usize,
    flags: Vec<(String, usize)>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, AppError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias))
        };

        let rdap_url = find(RDAP_COLUMNS).ok_or_else(|| AppError::missing_column("rdap_url"))?;
        let id = find(ID_COLUMNS).ok_or_else(|| AppError::missing_column("registrar id"))?;
        let name = find(NAME_COLUMNS).ok_or_else(|| AppError::missing_column("name"))?;

        let flags = FLAG_COLUMNS
            .iter()
            .filter_map(|alias| {
                normalized
                    .iter()
                    .position(|h| h == alias)
                    .map(|i| (alias.to_string(), i))
            })
            .collect();

        Ok(Self {
            id,
            name,
            domain_count: find(DOMAIN_COUNT_COLUMNS),
            rdap_url,
            flags,
        })
    }
}

/// Loads [`RegistrarRecord`]s from CSV, preserving row order.
///
/// Rows with an unusable registrar id are skipped with a warning, as are
/// repeated ids after their first occurrence.
pub struct CsvTableLoader;

impl CsvTableLoader {
    /// Reads the table at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingRequiredColumn`] if the id, name or RDAP URL
    /// column cannot be found, and [`AppError::Io`] / [`AppError::Csv`] for read
    /// failures.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<RegistrarRecord>, AppError> {
        let path = path.as_ref();
        debug!("Loading registrar table from {}", path.display());
        let records = Self::load_reader(File::open(path)?)?;
        info!("Loaded {} registrars from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn load_reader<R: Read>(reader: R) -> Result<Vec<RegistrarRecord>, AppError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns = ColumnMap::resolve(reader.headers()?)?;
        let mut seen = std::collections::HashSet::new();
        let mut records = Vec::new();

        for (row, result) in reader.records().enumerate() {
            let row_number = row + 2;
            let raw = result?;

            let Some(id) = raw.get(columns.id).and_then(parse_id) else {
                warn!(row = row_number, "Skipping row without a valid registrar id");
                continue;
            };
            if !seen.insert(id) {
                warn!(row = row_number, registrar_id = id, "Skipping duplicate registrar id");
                continue;
            }

            let name = raw.get(columns.name).unwrap_or_default().to_string();
            let domain_count = columns
                .domain_count
                .and_then(|i| raw.get(i))
                .and_then(parse_domain_count);
            let rdap_url = raw
                .get(columns.rdap_url)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let record = RegistrarRecord::new(id, name, domain_count, rdap_url)
                .with_source_flags(collect_flags(&raw, &columns.flags));
            records.push(record);
        }

        Ok(records)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_id(value: &str) -> Option<u32> {
    let value = value.trim();
    value.parse::<u32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

/// Parses a domain count, accepting thousands separators and spreadsheet floats.
///
/// Blank, negative or unparsable values yield `None`.
fn parse_domain_count(value: &str) -> Option<u64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<u64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
    })
}

fn collect_flags(raw: &StringRecord, flags: &[(String, usize)]) -> Option<String> {
    let parts: Vec<String> = flags
        .iter()
        .filter_map(|(label, i)| {
            raw.get(*i)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{label}={v}"))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
