//! File-based repository — one JSON wardrobe document.
//!
//! The whole document is read at startup and overwritten on every save.
//! A crash between a mutation and its save can lose that one mutation but
//! never corrupts earlier state. Human-inspectable, zero external services.
//!
//! Storage location: `~/.fitcheck/wardrobe.json` by default.

use async_trait::async_trait;
use fitcheck_core::error::StorageError;
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::snapshot::WardrobeSnapshot;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A file-backed wardrobe repository.
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Create a repository at the given path.
    ///
    /// The file is not touched until the first save; a missing file loads
    /// as the default (empty) snapshot.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl WardrobeRepository for FileRepository {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<WardrobeSnapshot, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => {
                debug!(path = %self.path.display(), "No wardrobe document yet, starting empty");
                return Ok(WardrobeSnapshot::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                // A corrupted document must not kill the bot; start fresh
                // and leave the broken file in place for inspection.
                warn!(path = %self.path.display(), error = %e, "Wardrobe document unreadable, starting empty");
                Ok(WardrobeSnapshot::default())
            }
        }
    }

    async fn save(&self, snapshot: &WardrobeSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create wardrobe directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        std::fs::write(&self.path, content)
            .map_err(|e| StorageError::Io(format!("Failed to write wardrobe document: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fitcheck_core::item::{Item, ItemId};
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn save_and_reload_roundtrips() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        let repo = FileRepository::new(path.clone());
        let now = Utc::now();
        let mut snapshot = WardrobeSnapshot::default();
        let id = ItemId::generate("calzado", 1, now);
        let mut details = BTreeMap::new();
        details.insert("color".to_string(), "negro".to_string());
        snapshot.items.insert(
            id.0.clone(),
            Item::new(id.clone(), "calzado", "Dr Martens 1460", details, now),
        );
        repo.save(&snapshot).await.unwrap();

        let repo2 = FileRepository::new(path);
        let loaded = repo2.load().await.unwrap();
        assert_eq!(loaded.items.len(), 1);
        let item = &loaded.items[&id.0];
        assert_eq!(item.name, "Dr Martens 1460");
        assert_eq!(item.details["color"], "negro");
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let repo = FileRepository::new(PathBuf::from("/tmp/fitcheck_test_missing_wardrobe.json"));
        let _ = std::fs::remove_file(repo.path());
        let loaded = repo.load().await.unwrap();
        assert!(loaded.items.is_empty());
    }

    #[tokio::test]
    async fn corrupted_file_loads_empty() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "this is not json").unwrap();
        let repo = FileRepository::new(tmp.path().to_path_buf());
        let loaded = repo.load().await.unwrap();
        assert!(loaded.items.is_empty());
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wardrobe.json");
        let repo = FileRepository::new(path.clone());
        repo.save(&WardrobeSnapshot::default()).await.unwrap();
        assert!(path.exists());
    }
}
