//! File-backed store.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "items": [ { "product_id": "...", "status": "active", ... } ]
//! }
//! ```
//!
//! # Defensive Design
//!
//! Any context may write this file at any time, so loading tolerates:
//! - Missing or empty files (empty list)
//! - Corrupt JSON (empty list, logged)
//! - Version mismatches (empty list, logged)
//!
//! # Atomic Writes
//!
//! Each write goes to a uniquely named temp file that is renamed over the
//! target, so readers never observe a partially written document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs_err::tokio as fs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{IdentityStore, ItemStore, SessionCache};
use crate::error::{Result, ShortlistError};
use crate::storage::StorageConfig;
use crate::types::{BrowserIdentity, ComparisonItem, Session};

const ITEMS_FILE_VERSION: u32 = 1;

/// The on-disk JSON structure for the items file.
///
/// Loaded with `T = Value` so one undecodable entry does not cost the rest.
#[derive(Debug, Serialize, Deserialize)]
struct ItemsFile<T> {
    /// Schema version. Only files with the current version are loaded.
    version: u32,
    #[serde(default)]
    items: Vec<T>,
}

/// Store that keeps each document in its own JSON file under the storage root.
///
/// Holds no in-memory copy: every `load` reads the file again.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    items_path: PathBuf,
    identity_path: PathBuf,
    last_session_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            items_path: storage.items_file(),
            identity_path: storage.identity_file(),
            last_session_path: storage.last_session_file(),
        }
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ComparisonItem>> {
        let Some(content) = read_optional(&self.items_path).await? else {
            return Ok(Vec::new());
        };

        if content.trim().is_empty() {
            warn!(path = %self.items_path.display(), "Empty items file, returning empty list");
            return Ok(Vec::new());
        }

        match serde_json::from_str::<ItemsFile<Value>>(&content) {
            Ok(file) if file.version == ITEMS_FILE_VERSION => Ok(decode_items(file.items)),
            Ok(file) => {
                warn!(
                    version = file.version,
                    expected = ITEMS_FILE_VERSION,
                    "Unsupported items file version, returning empty list"
                );
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(error = %err, "Failed to parse items file, returning empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, items: &[ComparisonItem]) -> Result<()> {
        let file = ItemsFile {
            version: ITEMS_FILE_VERSION,
            items: items.to_vec(),
        };
        write_json_atomic(&self.items_path, &file, "items").await?;
        debug!(count = items.len(), "Saved comparison list");
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for JsonFileStore {
    /// An unreadable identity file is an error rather than absent: replacing
    /// it would orphan every session the service holds for this browser.
    async fn load_identity(&self) -> Result<Option<BrowserIdentity>> {
        let Some(content) = read_optional(&self.identity_path).await? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ShortlistError::StoreEncoding {
                context: format!("decode {}", self.identity_path.display()),
                source,
            })
    }

    async fn save_identity(&self, identity: &BrowserIdentity) -> Result<()> {
        write_json_atomic(&self.identity_path, identity, "identity").await
    }
}

#[async_trait]
impl SessionCache for JsonFileStore {
    async fn load_last_session(&self) -> Result<Option<Session>> {
        read_json_optional(&self.last_session_path, "last session").await
    }

    async fn save_last_session(&self, session: &Session) -> Result<()> {
        write_json_atomic(&self.last_session_path, session, "last session").await
    }
}

fn decode_items(entries: Vec<Value>) -> Vec<ComparisonItem> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, error = %err, "Skipping undecodable list entry");
                None
            }
        })
        .collect()
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ShortlistError::store(format!("read {}", path.display()), err)),
    }
}

/// Reads a small JSON document; unreadable content counts as absent.
async fn read_json_optional<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Option<T>> {
    let Some(content) = read_optional(path).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(error = %err, file = what, "Ignoring unreadable document");
            Ok(None)
        }
    }
}

async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T, what: &str) -> Result<()> {
    let content =
        serde_json::to_vec_pretty(value).map_err(|source| ShortlistError::StoreEncoding {
            context: format!("serialize {}", what),
            source,
        })?;

    let parent = path.parent().ok_or_else(|| {
        ShortlistError::store(
            format!("{} path has no parent directory", what),
            std::io::Error::from(ErrorKind::InvalidInput),
        )
    })?;
    fs::create_dir_all(parent)
        .await
        .map_err(|e| ShortlistError::store(format!("create {} directory", what), e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    fs::write(&tmp_path, content)
        .await
        .map_err(|e| ShortlistError::store(format!("write temp {}", what), e))?;
    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(ShortlistError::store(format!("commit {}", what), err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;
    use tempfile::TempDir;

    use crate::types::ItemStatus;

    fn store_in(temp: &TempDir) -> JsonFileStore {
        JsonFileStore::new(&StorageConfig::with_root(temp.path().join("data")))
    }

    fn item(id: &str, status: ItemStatus) -> ComparisonItem {
        ComparisonItem {
            product_id: id.to_string(),
            title: format!("Item {}", id),
            price: "$1".to_string(),
            image: String::new(),
            retailer: "shop".to_string(),
            status,
            added_at: Utc::now(),
            updated_at: None,
            removed_at: None,
            reactivated_at: None,
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_load_nonexistent_file_returns_empty_list() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order_and_tombstones() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let items = vec![
            item("c", ItemStatus::Active),
            item("a", ItemStatus::Removed),
            item("b", ItemStatus::Active),
        ];

        store.save(&items).await.unwrap();
        let loaded = store.load().await.unwrap();

        let ids: Vec<_> = loaded.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(loaded[1].status, ItemStatus::Removed);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.save(&[item("a", ItemStatus::Active)]).await.unwrap();

        let parent = store.items_path().parent().unwrap();
        let names: Vec<_> = std::fs::read_dir(parent)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["items.json".to_string()]);
    }

    #[tokio::test]
    async fn test_load_empty_file_returns_empty_list() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::create_dir_all(store.items_path().parent().unwrap()).unwrap();
        std::fs::write(store.items_path(), "").unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_json_returns_empty_list() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::create_dir_all(store.items_path().parent().unwrap()).unwrap();
        std::fs::write(store.items_path(), "{invalid json}").unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unsupported_version_returns_empty_list() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::create_dir_all(store.items_path().parent().unwrap()).unwrap();
        std::fs::write(store.items_path(), r#"{"version":9,"items":[]}"#).unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_store_unavailable() {
        let temp = TempDir::new().unwrap();
        // A directory where the items file should be cannot be read as text.
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::create_dir_all(storage.items_file()).unwrap();
        let store = JsonFileStore::new(&storage);

        let err = store.load().await.unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[tokio::test]
    async fn test_identity_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.load_identity().await.unwrap().is_none());

        let identity = BrowserIdentity::generate();
        store.save_identity(&identity).await.unwrap();
        assert_eq!(store.load_identity().await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_corrupt_identity_is_reported_not_replaced() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.identity_file(), "{not json").unwrap();
        let store = JsonFileStore::new(&storage);

        let err = store.load_identity().await.unwrap_err();
        assert!(err.is_store_unavailable());
        assert_eq!(
            std::fs::read_to_string(storage.identity_file()).unwrap(),
            "{not json"
        );
    }

    #[tokio::test]
    async fn test_undecodable_entry_does_not_drop_the_list() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::create_dir_all(store.items_path().parent().unwrap()).unwrap();
        std::fs::write(
            store.items_path(),
            r#"{"version":1,"items":[
                {"product_id":"a","status":"active"},
                {"product_id":"b","status":"sideways"},
                {"product_id":"c","status":"removed"}
            ]}"#,
        )
        .unwrap();

        let loaded = store.load().await.unwrap();

        let ids: Vec<_> = loaded.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(loaded[1].is_removed());
    }

    #[tokio::test]
    async fn test_last_session_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let session = Session {
            session_id: "sid".to_string(),
            products: vec![item("a", ItemStatus::Active), item("b", ItemStatus::Active)],
            created_at: Utc::now(),
        };
        store.save_last_session(&session).await.unwrap();

        assert_eq!(store.load_last_session().await.unwrap(), Some(session));
    }
}
