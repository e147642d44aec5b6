//! In-memory repository — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use fitcheck_core::error::StorageError;
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::snapshot::WardrobeSnapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory repository holding the snapshot in a RwLock.
///
/// Counts saves so tests can assert that mutations persist.
pub struct InMemoryRepository {
    snapshot: Arc<RwLock<WardrobeSnapshot>>,
    saves: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(WardrobeSnapshot::default())),
            saves: AtomicUsize::new(0),
        }
    }

    /// Start from a prepared snapshot.
    pub fn with_snapshot(snapshot: WardrobeSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            saves: AtomicUsize::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WardrobeRepository for InMemoryRepository {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self) -> Result<WardrobeSnapshot, StorageError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &WardrobeSnapshot) -> Result<(), StorageError> {
        *self.snapshot.write().await = snapshot.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
