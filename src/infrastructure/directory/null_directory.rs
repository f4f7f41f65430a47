//! Directory that knows no registrars.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::RegistrarContact;
use crate::domain::repositories::RegistrarDirectory;
use crate::error::AppError;

/// A directory that answers "unknown" for every registrar.
///
/// Used when no directory source is configured, so enrichment output still lists
/// every registrar.
pub struct NullDirectory;

impl NullDirectory {
    pub fn new() -> Self {
        debug!("Using NullDirectory (enrichment disabled)");
        Self
    }
}

impl Default for NullDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrarDirectory for NullDirectory {
    async fn lookup(&self, _id: u32) -> Result<Option<RegistrarContact>, AppError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
