//! Error types for the fitcheck domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all fitcheck operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Wardrobe domain errors ---
    #[error("Wardrobe error: {0}")]
    Wardrobe(#[from] WardrobeError),

    // --- Persistence errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- AI suggester errors ---
    #[error("Suggestion error: {0}")]
    Suggest(#[from] SuggestError),

    // --- Channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors from the wardrobe stores (items, packing lists, profile).
///
/// These are all user-correctable: handlers render them as usage messages
/// and they never propagate past the handler boundary.
#[derive(Debug, Clone, Error)]
pub enum WardrobeError {
    #[error("Category not registered: {0}")]
    UnknownCategory(String),

    #[error("No item matches '{0}'")]
    ItemNotFound(String),

    #[error("'{fragment}' matches more than one item: {}", candidates.join(", "))]
    AmbiguousItem {
        fragment: String,
        candidates: Vec<String>,
    },

    #[error("No packing list named '{0}'")]
    ListNotFound(String),

    #[error("A packing list named '{0}' already exists")]
    ListExists(String),

    #[error("Index {index} is out of range for '{list}' (1..={len})")]
    IndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Invalid value '{value}' for profile field {field}")]
    InvalidValue { field: String, value: String },
}

/// Errors from the persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Errors from the AI suggestion collaborator.
#[derive(Debug, Clone, Error)]
pub enum SuggestError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from chat channel adapters.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wardrobe_error_displays_correctly() {
        let err = Error::Wardrobe(WardrobeError::UnknownCategory("sombreros".into()));
        assert!(err.to_string().contains("sombreros"));
    }

    #[test]
    fn ambiguous_item_lists_candidates() {
        let err = WardrobeError::AmbiguousItem {
            fragment: "negra".into(),
            candidates: vec!["tops_1_x (#1_x)".into(), "capas_2_y (#2_y)".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("negra"));
        assert!(msg.contains("tops_1_x"));
        assert!(msg.contains("capas_2_y"));
    }

    #[test]
    fn suggest_error_displays_correctly() {
        let err = Error::Suggest(SuggestError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }
}
