//! Lookup trait for external registrar metadata.

use crate::domain::entities::RegistrarContact;
use crate::error::AppError;
use async_trait::async_trait;

/// Source of registrar contact metadata, queried by registrar identifier.
///
/// The classification and aggregation pipeline never depends on a directory;
/// lookups only decorate results after the fact.
///
/// # Implementations
///
/// - [`crate::infrastructure::directory::JsonFileDirectory`] - JSON snapshot loaded into memory
/// - [`crate::infrastructure::directory::NullDirectory`] - knows nothing
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrarDirectory: Send + Sync {
    /// Looks up contact data for a registrar.
    ///
    /// Returns `Ok(None)` when the directory has no entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Enrichment`] if the directory could not be queried.
    async fn lookup(&self, id: u32) -> Result<Option<RegistrarContact>, AppError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}
