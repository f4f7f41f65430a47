//! Error taxonomy for the classification and aggregation pipeline.
//!
//! Only a few failures are fatal. A malformed RDAP URL is reported through
//! [`AppError::MalformedUrl`] by the authority extractor, but callers treat it as
//! "no authority" and keep going. A missing domain count is not an error at all.

use serde::Serialize;
use serde_json::{Value, json};

/// Structured rendering of an [`AppError`] for JSON output.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The source table lacks a column the pipeline cannot work without.
    #[error("Missing required column: {column}")]
    MissingRequiredColumn { column: String },

    #[error("Malformed RDAP URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// A reconciliation directive names a category that does not exist.
    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },

    #[error("Invalid pattern catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("Invalid directive: {message}")]
    InvalidDirective { message: String },

    #[error("Registrar lookup failed for id {id}: {message}")]
    Enrichment { id: u32, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingRequiredColumn {
            column: column.into(),
        }
    }

    pub fn malformed_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_category(name: impl Into<String>) -> Self {
        Self::UnknownCategory { name: name.into() }
    }

    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    pub fn invalid_directive(message: impl Into<String>) -> Self {
        Self::InvalidDirective {
            message: message.into(),
        }
    }

    pub fn enrichment(id: u32, message: impl Into<String>) -> Self {
        Self::Enrichment {
            id,
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingRequiredColumn { .. } => "missing_required_column",
            AppError::MalformedUrl { .. } => "malformed_url",
            AppError::UnknownCategory { .. } => "unknown_category",
            AppError::InvalidCatalog { .. } => "invalid_catalog",
            AppError::InvalidDirective { .. } => "invalid_directive",
            AppError::Enrichment { .. } => "enrichment_error",
            AppError::Io(_) => "io_error",
            AppError::Csv(_) => "csv_error",
            AppError::Json(_) => "json_error",
        }
    }

    /// Variant-specific context for structured output.
    pub fn details(&self) -> Value {
        match self {
            AppError::MissingRequiredColumn { column } => json!({ "column": column }),
            AppError::MalformedUrl { url, .. } => json!({ "url": url }),
            AppError::UnknownCategory { name } => json!({ "category": name }),
            AppError::Enrichment { id, .. } => json!({ "id": id }),
            _ => json!({}),
        }
    }

    /// Returns true for errors that abort the pipeline rather than degrading one record.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::MalformedUrl { .. } | AppError::Enrichment { .. }
        )
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_fatal() {
        let err = AppError::missing_column("rdap_url");

        assert!(err.is_fatal());
        assert_eq!(err.code(), "missing_required_column");
        assert_eq!(err.details(), json!({ "column": "rdap_url" }));
    }

    #[test]
    fn test_malformed_url_is_not_fatal() {
        let err = AppError::malformed_url("rdapserver.net", "relative URL without a base");

        assert!(!err.is_fatal());
        assert_eq!(err.code(), "malformed_url");
    }

    #[test]
    fn test_enrichment_error_is_not_fatal() {
        let err = AppError::enrichment(303, "timeout");

        assert!(!err.is_fatal());
        assert_eq!(err.details(), json!({ "id": 303 }));
    }

    #[test]
    fn test_error_info_rendering() {
        let info = AppError::unknown_category("NameBright").to_info();

        assert_eq!(info.code, "unknown_category");
        assert_eq!(info.message, "Unknown category: NameBright");
        assert_eq!(info.details, json!({ "category": "NameBright" }));
    }
}
