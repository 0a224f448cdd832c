//! `POST /` request handler for the input service.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use std::time::Instant;
use thiserror::Error;
use tracing::{field::Empty, Instrument, Span};

use crate::cep;
use crate::http::response::json_error;
use crate::observability::{metrics, record_error};
use crate::relay::client::EnrichmentClient;

/// Input service state.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub enrichment: EnrichmentClient,
}

impl RelayState {
    pub fn new(enrichment: EnrichmentClient) -> Self {
        Self { enrichment }
    }
}

/// Request body. A missing or `null` code reads as empty and fails validation.
#[derive(Debug, Deserialize)]
pub struct CepInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Failures produced by the input service itself.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("invalid zipcode")]
    InvalidZipcode,

    /// The only message that carries cause detail to the caller.
    #[error("failed to get weather from Service B: {0}")]
    Transport(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.to_string())
    }
}

async fn relay(state: &RelayState, body: &[u8]) -> Result<Response, RelayError> {
    let input: CepInput = serde_json::from_slice(body).map_err(RelayError::InvalidBody)?;
    Span::current().record("cep", input.cep.as_str());

    if !cep::is_valid_normalized(&input.cep) {
        return Err(RelayError::InvalidZipcode);
    }

    // The code is forwarded exactly as received; the weather service applies its own check.
    let downstream = state
        .enrichment
        .forward(&input.cep)
        .await
        .map_err(RelayError::Transport)?;

    Ok(downstream.into_response())
}

pub async fn relay_handler(State(state): State<RelayState>, body: Bytes) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "relay_handler",
        cep = Empty,
        otel.status_code = Empty,
        otel.status_message = Empty
    );

    let response = match relay(&state, &body).instrument(span.clone()).await {
        Ok(response) => response,
        Err(e) => {
            record_error(&span, &e);
            e.into_response()
        }
    };

    metrics::record_request("input", response.status().as_u16(), start);
    response
}
