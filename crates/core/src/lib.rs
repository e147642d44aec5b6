//! # Fitcheck Core
//!
//! Domain types, traits, and error definitions for the fitcheck wardrobe
//! assistant. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (persistence, chat platform, AI suggester,
//! weather) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod channel;
pub mod error;
pub mod history;
pub mod item;
pub mod packing;
pub mod profile;
pub mod repository;
pub mod snapshot;
pub mod suggest;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelId, ChannelMessage};
pub use error::{ChannelError, Error, Result, StorageError, SuggestError, WardrobeError};
pub use history::{FeedbackEntry, HistoryEntry, FEEDBACK_CONTEXT_LIMIT, HISTORY_CONTEXT_LIMIT};
pub use item::{Item, ItemId, ItemStatus};
pub use packing::PackingList;
pub use profile::{FieldValue, Profile, ProfileField};
pub use repository::WardrobeRepository;
pub use snapshot::WardrobeSnapshot;
pub use suggest::{OutfitSuggester, SuggestionRequest, WeatherReporter};
