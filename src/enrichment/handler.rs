//! `GET /weather?cep=` request handler.
//!
//! Pipeline, stopping at the first failing stage:
//! validate (422) → resolve locality (404) → lookup weather (404) → encode (500 on failure).

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{field::Empty, Instrument};

use crate::cep;
use crate::config::EnrichmentConfig;
use crate::enrichment::locality::LocalityResolver;
use crate::enrichment::types::{LookupError, ResolutionError, WeatherResponse};
use crate::enrichment::weather::WeatherLookup;
use crate::http::response::{encode_json, json_error};
use crate::observability::{metrics, record_error};

/// Collaborator clients injected into the handler.
#[derive(Debug, Clone)]
pub struct EnrichmentState {
    pub resolver: Arc<LocalityResolver>,
    pub weather: Arc<WeatherLookup>,
}

impl EnrichmentState {
    pub fn new(resolver: LocalityResolver, weather: WeatherLookup) -> Self {
        Self {
            resolver: Arc::new(resolver),
            weather: Arc::new(weather),
        }
    }

    /// Build both collaborator clients sharing one connection pool.
    pub fn from_config(config: &EnrichmentConfig, client: Client) -> Self {
        Self::new(
            LocalityResolver::new(client.clone(), config.viacep_base_url.clone()),
            WeatherLookup::new(client, config.weather_api_base_url.clone(), config.weather_api_key.clone()),
        )
    }
}

/// Client-visible failures. `Display` is the exact message sent to the caller.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    ZipcodeNotFound(#[source] ResolutionError),

    #[error("can not find weather for this location")]
    WeatherNotFound(#[source] LookupError),

    #[error("internal server error")]
    Encoding(#[source] serde_json::Error),
}

impl EnrichmentError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ZipcodeNotFound(_) | Self::WeatherNotFound(_) => StatusCode::NOT_FOUND,
            Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EnrichmentError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.to_string())
    }
}

/// First `cep` value of a raw query string.
pub fn cep_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "cep")
        .map(|(_, value)| value.into_owned())
}

/// Run the pipeline for one postal code.
pub async fn enrich(state: &EnrichmentState, cep: &str) -> Result<WeatherResponse, EnrichmentError> {
    if !cep::is_valid_strict(cep) {
        return Err(EnrichmentError::InvalidZipcode);
    }

    let locality = state
        .resolver
        .resolve(cep)
        .await
        .map_err(EnrichmentError::ZipcodeNotFound)?;

    let reading = state
        .weather
        .lookup(&locality.name)
        .await
        .map_err(EnrichmentError::WeatherNotFound)?;

    Ok(WeatherResponse::from_celsius(reading.temperature_celsius))
}

async fn respond(state: &EnrichmentState, cep: &str) -> Result<Response, EnrichmentError> {
    let weather = enrich(state, cep).await?;
    encode_json(StatusCode::OK, &weather).map_err(EnrichmentError::Encoding)
}

pub async fn weather_handler(State(state): State<EnrichmentState>, RawQuery(query): RawQuery) -> Response {
    let start = Instant::now();
    let cep = query.as_deref().and_then(cep_param).unwrap_or_default();

    let span = tracing::info_span!(
        "weather_handler",
        cep = %cep,
        otel.status_code = Empty,
        otel.status_message = Empty
    );

    let response = match respond(&state, &cep).instrument(span.clone()).await {
        Ok(response) => response,
        Err(e) => {
            record_error(&span, &e);
            e.into_response()
        }
    };

    metrics::record_request("weather-api", response.status().as_u16(), start);
    response
}
