//! Reconciliation of category renames and removals.
//!
//! Successive analysis runs tend to invent provisional categories ("RDAP Server
//! (Potential Gateway)") that later turn out to be a known provider, or to be
//! noise. This service folds such decisions into a canonical [`ResultSet`]:
//! registrar category pointers, the pattern catalog and the report move together,
//! and the report is always recomputed from the updated records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::services::Aggregator;
use crate::domain::entities::{MarketReport, PatternCatalog, RegistrarRecord};
use crate::error::AppError;

/// A change to the category set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Directive {
    /// Move every registrar in `from` to `to`, merging if `to` already exists.
    Rename { from: String, to: String },
    /// Drop a category; its registrars become unclassified.
    Remove { name: String },
}

impl Directive {
    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self::Remove { name: name.into() }
    }

    /// The category the directive acts on.
    pub fn source(&self) -> &str {
        match self {
            Directive::Rename { from, .. } => from,
            Directive::Remove { name } => name,
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        match self {
            Directive::Rename { from, to } => {
                if from.trim().is_empty() || to.trim().is_empty() {
                    return Err(AppError::invalid_directive("category names must not be empty"));
                }
                if from == to {
                    return Err(AppError::invalid_directive(format!(
                        "cannot rename '{from}' to itself"
                    )));
                }
            }
            Directive::Remove { name } => {
                if name.trim().is_empty() {
                    return Err(AppError::invalid_directive("category name must not be empty"));
                }
            }
        }
        Ok(())
    }
}

/// Parses `FROM=>TO` as a rename and `-NAME` as a removal.
impl FromStr for Directive {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let directive = if let Some(name) = s.strip_prefix('-') {
            Directive::remove(name.trim())
        } else if let Some((from, to)) = s.split_once("=>") {
            Directive::rename(from.trim(), to.trim())
        } else {
            return Err(AppError::invalid_directive(format!(
                "expected 'FROM=>TO' or '-NAME', got '{s}'"
            )));
        };

        directive.validate()?;
        Ok(directive)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Rename { from, to } => write!(f, "{from}=>{to}"),
            Directive::Remove { name } => write!(f, "-{name}"),
        }
    }
}

/// Persistable part of a [`ResultSet`].
///
/// The report is not stored; it is recomputed on restore so a stored
/// result set can never carry summaries that disagree with its records. The
/// catalog is validated when the snapshot is deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub catalog: PatternCatalog,
    pub records: Vec<RegistrarRecord>,
    #[serde(default)]
    pub applied: Vec<Directive>,
}

/// The canonical outcome of an analysis: catalog, annotated records, the report
/// derived from them, and the directives applied so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    catalog: PatternCatalog,
    records: Vec<RegistrarRecord>,
    applied: Vec<Directive>,
    report: MarketReport,
}

impl ResultSet {
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn records(&self) -> &[RegistrarRecord] {
        &self.records
    }

    pub fn applied(&self) -> &[Directive] {
        &self.applied
    }

    pub fn report(&self) -> &MarketReport {
        &self.report
    }

    /// Returns true if any record or the catalog still uses `name`.
    pub fn has_category(&self, name: &str) -> bool {
        self.catalog.contains(name) || self.records.iter().any(|r| r.is_in_category(name))
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot {
            catalog: self.catalog.clone(),
            records: self.records.clone(),
            applied: self.applied.clone(),
        }
    }
}

/// Builds result sets and applies [`Directive`]s to them.
pub struct ReconcileService {
    aggregator: Aggregator,
}

impl ReconcileService {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    /// Creates a result set from classified records.
    pub fn build(&self, catalog: PatternCatalog, records: Vec<RegistrarRecord>) -> ResultSet {
        let report = self.aggregator.aggregate(&records, &catalog);
        ResultSet {
            catalog,
            records,
            applied: Vec::new(),
            report,
        }
    }

    /// Rebuilds a result set from a snapshot, recomputing the report.
    pub fn restore(&self, snapshot: ResultSnapshot) -> ResultSet {
        let report = self.aggregator.aggregate(&snapshot.records, &snapshot.catalog);
        ResultSet {
            catalog: snapshot.catalog,
            records: snapshot.records,
            applied: snapshot.applied,
            report,
        }
    }

    /// Applies one directive and returns the new result set.
    ///
    /// Re-applying a directive whose source category is already gone and which is
    /// recorded in the ledger returns the set unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidDirective`] for malformed directives and
    /// [`AppError::UnknownCategory`] when the source category does not exist and
    /// the directive has not been applied before.
    pub fn apply(&self, set: &ResultSet, directive: &Directive) -> Result<ResultSet, AppError> {
        directive.validate()?;

        let source = directive.source();
        if !set.has_category(source) {
            if set.applied.contains(directive) {
                debug!(%directive, "Directive already applied");
                return Ok(set.clone());
            }
            return Err(AppError::unknown_category(source));
        }

        let (catalog, records) = match directive {
            Directive::Rename { from, to } => {
                let catalog = if set.catalog.contains(from) {
                    set.catalog.renamed(from, to)?
                } else {
                    set.catalog.clone()
                };
                let records = repoint(&set.records, from, Some(to));
                (catalog, records)
            }
            Directive::Remove { name } => {
                let catalog = if set.catalog.contains(name) {
                    set.catalog.without(name)?
                } else {
                    set.catalog.clone()
                };
                let records = repoint(&set.records, name, None);
                (catalog, records)
            }
        };

        let report = self.aggregator.aggregate(&records, &catalog);
        let mut applied = set.applied.clone();
        applied.push(directive.clone());

        info!(
            %directive,
            catalog_version = catalog.version(),
            categories = report.categories.len(),
            "Directive applied"
        );

        Ok(ResultSet {
            catalog,
            records,
            applied,
            report,
        })
    }

    /// Applies directives in order, stopping at the first error.
    pub fn apply_all(
        &self,
        set: &ResultSet,
        directives: &[Directive],
    ) -> Result<ResultSet, AppError> {
        directives
            .iter()
            .try_fold(set.clone(), |current, directive| self.apply(&current, directive))
    }
}

fn repoint(records: &[RegistrarRecord], from: &str, to: Option<&str>) -> Vec<RegistrarRecord> {
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if record.is_in_category(from) {
                record.category = to.map(str::to_string);
            }
            record
        })
        .collect()
}
