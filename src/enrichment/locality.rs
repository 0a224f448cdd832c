//! Locality resolver client (ViaCEP).

use reqwest::Client;
use tracing::{field::Empty, Instrument};

use crate::enrichment::types::{LocalityInfo, ResolutionError};
use crate::observability::{metrics, record_error};

/// Resolves a postal code to a city name.
#[derive(Debug, Clone)]
pub struct LocalityResolver {
    client: Client,
    base_url: String,
}

impl LocalityResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `{base}/ws/{cep}/json/`
    pub fn url_for(&self, cep: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url.trim_end_matches('/'), cep)
    }

    /// Look up `cep` under a `resolve_locality` span. Single attempt.
    pub async fn resolve(&self, cep: &str) -> Result<LocalityInfo, ResolutionError> {
        let span = tracing::info_span!(
            "resolve_locality",
            cep = %cep,
            otel.status_code = Empty,
            otel.status_message = Empty
        );

        let result = self.fetch(cep).instrument(span.clone()).await;

        match &result {
            Ok(info) => {
                tracing::debug!(parent: &span, locality = %info.name, "Postal code resolved");
                metrics::record_collaborator_call("viacep", "ok");
            }
            Err(e) => {
                record_error(&span, e);
                metrics::record_collaborator_call("viacep", e.kind());
            }
        }
        result
    }

    async fn fetch(&self, cep: &str) -> Result<LocalityInfo, ResolutionError> {
        let response = self.client.get(self.url_for(cep)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::NotFound(format!("{cep} (status {status})")));
        }

        let body = response.bytes().await?;
        tracing::debug!(body = %String::from_utf8_lossy(&body), "ViaCEP response");

        let info: LocalityInfo = serde_json::from_slice(&body)?;
        if info.is_not_found() {
            return Err(ResolutionError::NotFound(cep.to_string()));
        }

        Ok(info)
    }
}
