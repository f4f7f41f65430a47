//! Registrar directory backed by a JSON snapshot.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::entities::RegistrarContact;
use crate::domain::repositories::RegistrarDirectory;
use crate::error::AppError;

/// In-memory directory loaded once from a JSON array of [`RegistrarContact`]s.
///
/// ```json
/// [{ "id": 303, "website": "https://publicdomainregistry.com", "email": "..." }]
/// ```
///
/// Later entries with an id already seen are ignored.
pub struct JsonFileDirectory {
    contacts: HashMap<u32, RegistrarContact>,
}

impl JsonFileDirectory {
    pub fn from_contacts(contacts: Vec<RegistrarContact>) -> Self {
        let mut map = HashMap::with_capacity(contacts.len());
        for contact in contacts {
            if map.contains_key(&contact.id) {
                warn!(registrar_id = contact.id, "Duplicate directory entry ignored");
                continue;
            }
            map.insert(contact.id, contact);
        }
        Self { contacts: map }
    }

    /// Loads the directory from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the file cannot be read and [`AppError::Json`]
    /// if it is not a JSON array of contacts.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let contacts: Vec<RegistrarContact> = serde_json::from_str(&content)?;
        let directory = Self::from_contacts(contacts);
        info!(
            "Loaded {} registrar contacts from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[async_trait]
impl RegistrarDirectory for JsonFileDirectory {
    async fn lookup(&self, id: u32) -> Result<Option<RegistrarContact>, AppError> {
        Ok(self.contacts.get(&id).cloned())
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_lookup_known_and_unknown() {
        let directory = JsonFileDirectory::from_contacts(vec![RegistrarContact {
            id: 303,
            website: Some("https://publicdomainregistry.com".to_string()),
            ..Default::default()
        }]);

        let found = directory.lookup(303).await.unwrap();
        let missing = directory.lookup(1).await.unwrap();

        assert_eq!(
            found.unwrap().website.as_deref(),
            Some("https://publicdomainregistry.com")
        );
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first() {
        let directory = JsonFileDirectory::from_contacts(vec![
            RegistrarContact {
                id: 1,
                email: Some("first@example.com".to_string()),
                ..Default::default()
            },
            RegistrarContact {
                id: 1,
                email: Some("second@example.com".to_string()),
                ..Default::default()
            },
        ]);

        assert_eq!(directory.len(), 1);
        let contact = directory.lookup(1).await.unwrap().unwrap();
        assert_eq!(contact.email.as_deref(), Some("first@example.com"));
    }

    #[tokio::test]
    async fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"id": 955, "name": "Launchpad.com Inc.", "address": {{"country": "US"}}}}]"#
        )
        .unwrap();

        let directory = JsonFileDirectory::from_path(file.path()).await.unwrap();

        let contact = directory.lookup(955).await.unwrap().unwrap();
        assert_eq!(contact.address.unwrap().country.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn test_from_path_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let result = JsonFileDirectory::from_path(file.path()).await;

        assert!(matches!(result, Err(AppError::Json(_))));
    }
}
