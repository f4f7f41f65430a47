//! JSON output documents.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::application::services::{AnalysisOutcome, ClassificationStats, ResultSnapshot};
use crate::domain::entities::{AuthorityUsage, CandidateGateway, MarketReport, PatternOverlap};
use crate::error::AppError;

/// The `report.json` document.
#[derive(Debug, Serialize)]
pub struct AnalysisDocument<'a> {
    pub analyzed_at: DateTime<Utc>,
    pub classification: Option<&'a ClassificationStats>,
    pub report: &'a MarketReport,
    pub candidates: &'a [CandidateGateway],
    pub top_rdap_authorities: &'a [AuthorityUsage],
    pub catalog_overlaps: &'a [PatternOverlap],
    pub applied_directives: Vec<String>,
}

impl<'a> AnalysisDocument<'a> {
    pub fn from_outcome(outcome: &'a AnalysisOutcome) -> Self {
        Self {
            analyzed_at: outcome.analyzed_at,
            classification: Some(&outcome.classification),
            report: outcome.result_set.report(),
            candidates: &outcome.candidates,
            top_rdap_authorities: &outcome.authority_usage,
            catalog_overlaps: &outcome.ambiguities,
            applied_directives: outcome
                .result_set
                .applied()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), AppError> {
    debug!("Writing JSON to {}", path.display());

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Wrote {}", path.display());
    Ok(())
}

/// Reads a result-set snapshot written by a previous run.
pub fn read_snapshot(path: &Path) -> Result<ResultSnapshot, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{AnalysisOptions, AnalysisService};
    use crate::domain::entities::{PatternCatalog, RegistrarRecord};

    fn outcome() -> AnalysisOutcome {
        let records = vec![
            RegistrarRecord::new(
                1,
                "Acme".to_string(),
                Some(100),
                Some("https://rdap.rrpproxy.net".to_string()),
            ),
            RegistrarRecord::new(2, "Beta".to_string(), Some(50), None),
        ];
        AnalysisService::new(AnalysisOptions::default()).run(PatternCatalog::builtin(), records)
    }

    #[test]
    fn test_analysis_document_shape() {
        let outcome = outcome();

        let value = serde_json::to_value(AnalysisDocument::from_outcome(&outcome)).unwrap();

        assert_eq!(
            value["report"]["categories"]["RRPProxy/CentralNic"]["registrar_count"],
            1
        );
        assert_eq!(value["report"]["total_domains"], 150);
        assert_eq!(value["classification"]["missing_url"], 1);
        assert!(value["candidates"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result_set.json");
        let snapshot = outcome().result_set.snapshot();

        write_json(&snapshot, &path).unwrap();
        let restored = read_snapshot(&path).unwrap();

        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_read_snapshot_rejects_invalid_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result_set.json");
        std::fs::write(
            &path,
            r#"{
                "catalog": {
                    "version": 3,
                    "providers": [
                        { "name": "Gransy", "patterns": ["rdap.gransy.com"] },
                        { "name": "Gransy", "patterns": ["gransy.net"] }
                    ]
                },
                "records": []
            }"#,
        )
        .unwrap();

        let result = read_snapshot(&path);

        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn test_read_snapshot_normalises_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result_set.json");
        std::fs::write(
            &path,
            r#"{
                "catalog": { "version": 3, "providers": [{ "name": "Gransy", "patterns": ["RDAP.Gransy.com "] }] },
                "records": []
            }"#,
        )
        .unwrap();

        let snapshot = read_snapshot(&path).unwrap();

        assert_eq!(
            snapshot.catalog.get("Gransy").unwrap().patterns,
            vec!["rdap.gransy.com"]
        );
        assert!(snapshot.applied.is_empty());
    }

    #[test]
    fn test_read_snapshot_missing_file() {
        let result = read_snapshot(Path::new("/definitely/not/here.json"));

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
