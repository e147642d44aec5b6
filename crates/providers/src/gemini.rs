//! Gemini suggester implementation.
//!
//! Talks to the Google Generative Language API (`generateContent`,
//! non-streaming). The stylist persona lives in a fixed system
//! instruction; everything situational — wardrobe context, date,
//! weather, the user's request — goes in the single user turn.

use async_trait::async_trait;
use fitcheck_core::error::SuggestError;
use fitcheck_core::suggest::{OutfitSuggester, SuggestionRequest};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// System instruction sent with every request. Spanish, like the rest of
/// the bot's surface.
const SYSTEM_PROMPT: &str = "\
Eres un estilista personal experto. Recibes un JSON con el guardarropa \
de tu cliente: perfil físico, prendas disponibles, prendas sucias, \
outfits recientes y feedback previo.

Reglas:
- Sugiere SOLO prendas de la lista de disponibles; nunca inventes prendas.
- No repitas el mismo outfit de los últimos días salvo que el cliente lo pida.
- Toma en cuenta el clima y la ocasión que el cliente describa.
- Considera el perfil físico (tono de piel, subtono, pelo) al combinar colores.
- Si hay feedback previo, respétalo.
- Si hay muchas prendas sucias, menciónalo brevemente al final.
- Responde en español, conciso y directo: el outfit primero, una línea de \
por qué funciona después. Sin listas de alternativas salvo que se pidan.";

/// An outfit suggester backed by the Gemini API.
pub struct GeminiSuggester {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiSuggester {
    /// Create a suggester for the given model against the public API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model)
    }

    /// Create a suggester against a custom endpoint (tests, proxies).
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }

    /// Assemble the single user turn from a suggestion request.
    fn build_user_prompt(request: &SuggestionRequest) -> String {
        let mut prompt = format!(
            "CONTEXTO DEL GUARDARROPA:\n{}\n\nFECHA Y HORA: {}\n",
            request.context_json, request.local_time
        );
        if let Some(weather) = &request.weather {
            prompt.push_str(&format!("\nCLIMA: {weather}\n"));
        }
        prompt.push_str(&format!("\nSOLICITUD: {}", request.request));
        prompt
    }

    /// Pull the suggestion text out of a parsed API response.
    fn extract_text(response: ApiResponse) -> Result<String, SuggestError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SuggestError::MalformedResponse("no candidates".into()))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(SuggestError::MalformedResponse(
                "candidate has no text parts".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl OutfitSuggester for GeminiSuggester {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn suggest(&self, request: SuggestionRequest) -> Result<String, SuggestError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": SYSTEM_PROMPT }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": Self::build_user_prompt(&request) }]
            }],
        });

        debug!(model = %self.model, "Sending suggestion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SuggestError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(SuggestError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(SuggestError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Suggester returned error");
            return Err(SuggestError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::MalformedResponse(e.to_string()))?;

        Self::extract_text(api_response)
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    content: ApiContent,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weather: Option<&str>) -> SuggestionRequest {
        SuggestionRequest {
            context_json: r#"{"profile":{}}"#.into(),
            request: "outfit para la oficina".into(),
            weather: weather.map(String::from),
            local_time: "2025-03-10 07:00 (lunes)".into(),
        }
    }

    #[test]
    fn prompt_includes_context_time_and_request() {
        let prompt = GeminiSuggester::build_user_prompt(&request(None));
        assert!(prompt.contains(r#"{"profile":{}}"#));
        assert!(prompt.contains("2025-03-10 07:00"));
        assert!(prompt.contains("SOLICITUD: outfit para la oficina"));
        assert!(!prompt.contains("CLIMA"));
    }

    #[test]
    fn prompt_includes_weather_when_present() {
        let prompt = GeminiSuggester::build_user_prompt(&request(Some("22°C, soleado")));
        assert!(prompt.contains("CLIMA: 22°C, soleado"));
    }

    #[test]
    fn extract_text_joins_parts() {
        let data = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "Botas negras"}, {"text": " y playera blanca."}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let text = GeminiSuggester::extract_text(parsed).unwrap();
        assert_eq!(text, "Botas negras y playera blanca.");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            GeminiSuggester::extract_text(parsed),
            Err(SuggestError::MalformedResponse(_))
        ));
    }

    #[test]
    fn extract_text_rejects_textless_candidate() {
        let data = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(matches!(
            GeminiSuggester::extract_text(parsed),
            Err(SuggestError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let suggester =
            GeminiSuggester::with_base_url("http://127.0.0.1:1/v1beta", "key", "model");
        let err = suggester.suggest(request(None)).await.unwrap_err();
        assert!(matches!(err, SuggestError::Network(_)));
    }
}
