//! Repository trait — the abstraction over persistence backends.
//!
//! The wardrobe is loaded once at startup and the whole snapshot is saved
//! after every mutation. Backends only have to answer `load` and `save`;
//! how they map the snapshot to storage (one JSON document, one table per
//! entity) is their business.
//!
//! Implementations: file (JSON document), SQLite, in-memory (for testing).

use async_trait::async_trait;

use crate::error::StorageError;
use crate::snapshot::WardrobeSnapshot;

/// The core persistence trait.
#[async_trait]
pub trait WardrobeRepository: Send + Sync {
    /// The backend name (e.g., "file", "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Load the full snapshot. Missing storage yields the default snapshot.
    async fn load(&self) -> std::result::Result<WardrobeSnapshot, StorageError>;

    /// Persist the full snapshot.
    async fn save(&self, snapshot: &WardrobeSnapshot) -> std::result::Result<(), StorageError>;
}
