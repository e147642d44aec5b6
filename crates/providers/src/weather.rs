//! wttr.in weather reporter.
//!
//! Fetches the `?format=j1` JSON for a city and condenses it to one
//! human-readable line for the suggestion prompt. Weather is decoration,
//! never a blocker: every failure path collapses to a fixed fallback
//! string and a warning in the log.

use async_trait::async_trait;
use fitcheck_core::suggest::WeatherReporter;
use serde_json::Value;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://wttr.in";

/// Shown instead of a report when the lookup fails in any way.
pub const WEATHER_UNAVAILABLE: &str = "Clima no disponible";

/// A weather reporter backed by wttr.in.
pub struct WttrWeather {
    base_url: String,
    client: reqwest::Client,
}

impl Default for WttrWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl WttrWeather {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point at a custom endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl WeatherReporter for WttrWeather {
    async fn report(&self, city: &str) -> String {
        let url = format!("{}/{}?format=j1", self.base_url, city);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(city, error = %e, "Weather lookup failed");
                return WEATHER_UNAVAILABLE.to_string();
            }
        };

        if !response.status().is_success() {
            warn!(city, status = response.status().as_u16(), "Weather lookup failed");
            return WEATHER_UNAVAILABLE.to_string();
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(city, error = %e, "Weather response was not JSON");
                return WEATHER_UNAVAILABLE.to_string();
            }
        };

        match summarize(&body) {
            Some(summary) => {
                debug!(city, %summary, "Weather lookup ok");
                summary
            }
            None => {
                warn!(city, "Weather response missing expected fields");
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Condense a wttr.in `j1` document to one line.
///
/// Needs the current condition block; the daily min/max and midday rain
/// chance are appended only when present.
pub fn summarize(body: &Value) -> Option<String> {
    let current = body["current_condition"].get(0)?;
    let temp = current["temp_C"].as_str()?;
    let feels = current["FeelsLikeC"].as_str()?;
    let desc = current["lang_es"]
        .get(0)
        .and_then(|d| d["value"].as_str())
        .or_else(|| current["weatherDesc"].get(0).and_then(|d| d["value"].as_str()))?;
    let humidity = current["humidity"].as_str()?;

    let mut summary = format!(
        "{temp}°C (sensación {feels}°C), {}, humedad {humidity}%",
        desc.to_lowercase()
    );

    if let Some(today) = body["weather"].get(0) {
        if let (Some(min), Some(max)) =
            (today["mintempC"].as_str(), today["maxtempC"].as_str())
        {
            summary.push_str(&format!(". Min {min}°C / Max {max}°C"));
        }
        // Index 4 is the midday slot in wttr.in's 3-hourly forecast.
        if let Some(rain) = today["hourly"]
            .get(4)
            .and_then(|h| h["chanceofrain"].as_str())
        {
            summary.push_str(&format!(". Prob. de lluvia: {rain}%"));
        }
    }

    Some(summary)
}
