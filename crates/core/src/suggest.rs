//! Suggester and weather traits — the outbound AI collaborators.
//!
//! The suggester receives a serialized context snapshot plus the user's
//! request and returns one text blob, relayed verbatim. The weather
//! reporter returns a short human-readable string and never fails: any
//! lookup problem collapses to a fixed fallback inside the implementation.

use async_trait::async_trait;

use crate::error::SuggestError;

/// Everything the AI suggester needs for a single request.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    /// Serialized context snapshot (JSON) — profile, available items,
    /// dirty items, recent history, feedback, packing lists.
    pub context_json: String,

    /// The user's free-text request ("voy a un bar con amigos").
    pub request: String,

    /// Current weather string, when a city is configured.
    pub weather: Option<String>,

    /// Current local date/time, preformatted.
    pub local_time: String,
}

/// The AI suggestion collaborator.
#[async_trait]
pub trait OutfitSuggester: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Ask for an outfit. The returned text is relayed to the user as-is.
    async fn suggest(
        &self,
        request: SuggestionRequest,
    ) -> std::result::Result<String, SuggestError>;
}

/// The weather collaborator.
///
/// Infallible by contract: implementations log failures and return a
/// fixed fallback string instead of propagating errors.
#[async_trait]
pub trait WeatherReporter: Send + Sync {
    async fn report(&self, city: &str) -> String;
}
