//! Weather lookup client (WeatherAPI).

use reqwest::Client;
use tracing::{field::Empty, Instrument};

use crate::enrichment::types::{LookupError, WeatherApiResponse, WeatherReading};
use crate::observability::{metrics, record_error};

/// Fetches current conditions for a locality.
#[derive(Clone)]
pub struct WeatherLookup {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for WeatherLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherLookup")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherLookup {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// `{base}/current.json`
    pub fn endpoint(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }

    /// Current temperature for `locality` under a `lookup_weather` span. Single attempt.
    pub async fn lookup(&self, locality: &str) -> Result<WeatherReading, LookupError> {
        let span = tracing::info_span!(
            "lookup_weather",
            city = %locality,
            otel.status_code = Empty,
            otel.status_message = Empty
        );

        let result = self.fetch(locality).instrument(span.clone()).await;

        match &result {
            Ok(reading) => {
                tracing::debug!(parent: &span, temp_c = reading.temperature_celsius, "Weather fetched");
                metrics::record_collaborator_call("weatherapi", "ok");
            }
            Err(e) => {
                record_error(&span, e);
                metrics::record_collaborator_call("weatherapi", e.kind());
            }
        }
        result
    }

    async fn fetch(&self, locality: &str) -> Result<WeatherReading, LookupError> {
        // The query carries the API key; strip URLs from reqwest errors before they reach logs.
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("key", self.api_key.as_str()), ("q", locality)])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "WeatherAPI error response");
            return Err(LookupError::NotFound(locality.to_string()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;
        tracing::debug!(body = %String::from_utf8_lossy(&body), "WeatherAPI response");

        let parsed: WeatherApiResponse = serde_json::from_slice(&body)?;
        Ok(parsed.into())
    }
}
