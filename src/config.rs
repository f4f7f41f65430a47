//! Run configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup (after `dotenvy::dotenv()`) and
//! validated before any input is read. Command-line flags override the values
//! read here.
//!
//! ## Variables
//!
//! ```bash
//! export GATEWAY_INPUT="data/registrars.csv"
//! export GATEWAY_OUTPUT_DIR="output"
//! export GATEWAY_CATALOG="catalog.json"        # built-in catalog when unset
//! export CANDIDATE_MIN_REGISTRARS="2"
//! export TOP_N="5"
//! export SELF_HOSTED_TOP_N="10"
//! export REGISTRAR_DIRECTORY="directory.json"  # enrichment source, optional
//! export ENRICHMENT_RETRIES="3"
//! ```
//!
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::application::services::AnalysisOptions;
use crate::application::services::enrichment_service::DEFAULT_RETRIES;
use crate::domain::entities::PatternCatalog;

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source registrar table (`GATEWAY_INPUT`).
    pub input_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// JSON catalog file. The built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub candidate_min_registrars: usize,
    pub top_n: usize,
    pub self_hosted_top_n: usize,
    /// Length of the RDAP authority usage ranking (`TOP_AUTHORITIES`, default: 20).
    pub top_authorities: usize,
    pub registrar_directory: Option<PathBuf>,
    pub enrichment_retries: usize,
    pub log_level: String,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        let options = AnalysisOptions::default();
        Self {
            input_path: None,
            output_dir: PathBuf::from("output"),
            catalog_path: None,
            candidate_min_registrars: options.min_registrars,
            top_n: options.top_n,
            self_hosted_top_n: options.self_hosted_top_n,
            top_authorities: options.authority_limit,
            registrar_directory: None,
            enrichment_retries: DEFAULT_RETRIES,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            input_path: env_path("GATEWAY_INPUT"),
            output_dir: env_path("GATEWAY_OUTPUT_DIR").unwrap_or(defaults.output_dir),
            catalog_path: env_path("GATEWAY_CATALOG"),
            candidate_min_registrars: env_number(
                "CANDIDATE_MIN_REGISTRARS",
                defaults.candidate_min_registrars,
            )?,
            top_n: env_number("TOP_N", defaults.top_n)?,
            self_hosted_top_n: env_number("SELF_HOSTED_TOP_N", defaults.self_hosted_top_n)?,
            top_authorities: env_number("TOP_AUTHORITIES", defaults.top_authorities)?,
            registrar_directory: env_path("REGISTRAR_DIRECTORY"),
            enrichment_retries: env_number("ENRICHMENT_RETRIES", defaults.enrichment_retries)?,
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `candidate_min_registrars` is below 2
    /// - `top_n` is outside `1..=100`
    /// - `enrichment_retries` is above 10
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if self.candidate_min_registrars < 2 {
            anyhow::bail!(
                "CANDIDATE_MIN_REGISTRARS must be at least 2, got {}",
                self.candidate_min_registrars
            );
        }

        if self.top_n == 0 || self.top_n > 100 {
            anyhow::bail!("TOP_N must be between 1 and 100, got {}", self.top_n);
        }

        if self.self_hosted_top_n > 1_000 {
            anyhow::bail!(
                "SELF_HOSTED_TOP_N is too large (max: 1000), got {}",
                self.self_hosted_top_n
            );
        }

        if self.top_authorities == 0 {
            anyhow::bail!("TOP_AUTHORITIES must be greater than 0");
        }

        if self.enrichment_retries > 10 {
            anyhow::bail!(
                "ENRICHMENT_RETRIES must be at most 10, got {}",
                self.enrichment_retries
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            min_registrars: self.candidate_min_registrars,
            top_n: self.top_n,
            self_hosted_top_n: self.self_hosted_top_n,
            authority_limit: self.top_authorities,
        }
    }

    /// Loads the configured catalog, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<PatternCatalog> {
        match &self.catalog_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read catalog {}", path.display()))?;
                PatternCatalog::from_json(&content)
                    .with_context(|| format!("Invalid catalog {}", path.display()))
            }
            None => Ok(PatternCatalog::builtin()),
        }
    }

    /// Path of a named output file inside the output directory.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        match &self.input_path {
            Some(path) => tracing::info!("  Input: {}", path.display()),
            None => tracing::info!("  Input: not set"),
        }
        tracing::info!("  Output directory: {}", self.output_dir.display());
        match &self.catalog_path {
            Some(path) => tracing::info!("  Catalog: {}", path.display()),
            None => tracing::info!("  Catalog: built-in"),
        }
        tracing::info!(
            "  Candidate threshold: {} registrars",
            self.candidate_min_registrars
        );
        tracing::info!(
            "  Top N: {} (self-hosted: {})",
            self.top_n,
            self.self_hosted_top_n
        );
        if let Some(path) = &self.registrar_directory {
            tracing::info!(
                "  Registrar directory: {} ({} retries)",
                path.display(),
                self.enrichment_retries
            );
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn env_number(key: &str, default: usize) -> Result<usize> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 11] = [
        "GATEWAY_INPUT",
        "GATEWAY_OUTPUT_DIR",
        "GATEWAY_CATALOG",
        "CANDIDATE_MIN_REGISTRARS",
        "TOP_N",
        "SELF_HOSTED_TOP_N",
        "TOP_AUTHORITIES",
        "REGISTRAR_DIRECTORY",
        "ENRICHMENT_RETRIES",
        "RUST_LOG",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially
        unsafe {
            for key in KEYS {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.candidate_min_registrars = 1;
        assert!(config.validate().is_err());
        config.candidate_min_registrars = 3;
        assert!(config.validate().is_ok());

        config.top_n = 0;
        assert!(config.validate().is_err());
        config.top_n = 101;
        assert!(config.validate().is_err());
        config.top_n = 5;

        config.enrichment_retries = 11;
        assert!(config.validate().is_err());
        config.enrichment_retries = 0;
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.input_path, None);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.candidate_min_registrars, 2);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.self_hosted_top_n, 10);
        assert_eq!(config.enrichment_retries, 3);
        assert_eq!(config.log_format, "text");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("GATEWAY_INPUT", "data/registrars.csv");
            env::set_var("GATEWAY_OUTPUT_DIR", "/tmp/out");
            env::set_var("CANDIDATE_MIN_REGISTRARS", "3");
            env::set_var("TOP_N", " 7 ");
            env::set_var("REGISTRAR_DIRECTORY", "");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(
            config.input_path,
            Some(PathBuf::from("data/registrars.csv"))
        );
        assert_eq!(config.output_file("report.json"), PathBuf::from("/tmp/out/report.json"));
        assert_eq!(config.candidate_min_registrars, 3);
        assert_eq!(config.top_n, 7);
        assert_eq!(config.registrar_directory, None);

        let options = config.analysis_options();
        assert_eq!(options.min_registrars, 3);
        assert_eq!(options.top_n, 7);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage_numbers() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("TOP_N", "five");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_from_env_validates() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CANDIDATE_MIN_REGISTRARS", "1");
        }

        assert!(load_from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_load_catalog() {
        let config = Config::default();
        assert_eq!(config.load_catalog().unwrap(), PatternCatalog::builtin());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"version": 4, "providers": [{"name": "Acme", "patterns": ["acme.net"]}]}"#,
        )
        .unwrap();
        let config = Config {
            catalog_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };

        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.version(), 4);
        assert!(catalog.contains("Acme"));

        let config = Config {
            catalog_path: Some(PathBuf::from("/definitely/not/here.json")),
            ..Config::default()
        };
        assert!(config.load_catalog().is_err());
    }
}
