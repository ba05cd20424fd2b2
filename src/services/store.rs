//! Per-user trusted-contact persistence.
//!
//! One JSON array file per user id under the data directory. Writes replace
//! the whole array; there is no merge and no locking, so concurrent writers
//! for the same user race and the last write wins.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::contacts::Contact;
use crate::error::ApiError;

/// Storage interface for a user's contact list.
///
/// Keyed by opaque user id; read-all/write-all only, so a database-backed
/// implementation can replace the flat file without touching the handlers.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Return the stored contacts, or an empty list if none were ever saved.
    async fn read_all(&self, uid: &str) -> Result<Vec<Contact>, ApiError>;

    /// Replace the stored contacts and return the count written.
    async fn write_all(&self, uid: &str, contacts: &[Contact]) -> Result<usize, ApiError>;
}

/// Flat-file store: `{data_dir}/contacts_{uid}.json`.
pub struct FileContactStore {
    data_dir: PathBuf,
}

impl FileContactStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create the data directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), ApiError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to create data directory: {}", e)))
    }

    fn file_path(&self, uid: &str) -> Result<PathBuf, ApiError> {
        validate_uid(uid)?;
        Ok(self.data_dir.join(format!("contacts_{}.json", uid)))
    }
}

/// The uid becomes part of a file name; reject anything that could escape
/// the data directory.
fn validate_uid(uid: &str) -> Result<(), ApiError> {
    if uid.is_empty()
        || uid == "."
        || uid == ".."
        || uid.contains('/')
        || uid.contains('\\')
        || uid.contains("..")
    {
        return Err(ApiError::BadRequest("Invalid user id".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn read_all(&self, uid: &str) -> Result<Vec<Contact>, ApiError> {
        let path = self.file_path(uid)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ApiError::Storage(format!(
                    "Failed to read contact file: {}",
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Storage(format!("Malformed contact file: {}", e)))
    }

    async fn write_all(&self, uid: &str, contacts: &[Contact]) -> Result<usize, ApiError> {
        let path = self.file_path(uid)?;
        let bytes = serde_json::to_vec(contacts)
            .map_err(|e| ApiError::Storage(format!("Failed to serialize contacts: {}", e)))?;

        // Write to a sibling temp file and rename so a crash mid-write never
        // leaves a truncated array behind.
        let tmp = temp_path(&path);
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write contact file: {}", e)))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write contact file: {}", e)))?;

        tracing::debug!(uid = uid, count = contacts.len(), "Contacts saved");
        Ok(contacts.len())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_owned();
    p.push(".tmp");
    PathBuf::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact {
            id: None,
            name: name.to_string(),
            phone: phone.to_string(),
            relation: Some("friend".to_string()),
            trusted: true,
        }
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContactStore::new(dir.path());

        let contacts = vec![contact("Ana", "+15550001"), contact("Bea", "+15550002")];
        let count = store.write_all("user-1", &contacts).await.unwrap();
        assert_eq!(count, 2);

        let read = store.read_all("user-1").await.unwrap();
        assert_eq!(read, contacts);
    }

    #[tokio::test]
    async fn unknown_uid_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContactStore::new(dir.path());

        let read = store.read_all("never-written").await.unwrap();
        assert!(read.is_empty());
    }

    #[tokio::test]
    async fn second_write_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContactStore::new(dir.path());

        store
            .write_all("u", &[contact("Ana", "+15550001"), contact("Bea", "+15550002")])
            .await
            .unwrap();
        store.write_all("u", &[contact("Cal", "+15550003")]).await.unwrap();

        let read = store.read_all("u").await.unwrap();
        assert_eq!(read, vec![contact("Cal", "+15550003")]);
    }

    #[tokio::test]
    async fn malformed_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContactStore::new(dir.path());

        std::fs::write(dir.path().join("contacts_bad.json"), b"not json").unwrap();

        let err = store.read_all("bad").await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[tokio::test]
    async fn path_escaping_uid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContactStore::new(dir.path());

        for uid in ["../etc", "a/b", "..", ""] {
            let err = store.read_all(uid).await.unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "uid: {:?}", uid);
        }
    }
}
