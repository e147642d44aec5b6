//! Persistence backends for the fitcheck wardrobe.
//!
//! All backends implement `fitcheck_core::WardrobeRepository`:
//! - **file** — one JSON document, whole-document overwrite per save
//! - **sqlite** — one table per entity, rewritten per save
//! - **in_memory** — test fake, no durability

pub mod file;
pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileRepository;
pub use in_memory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
