//! Response helpers shared by both services.
//!
//! # Responsibilities
//! - Error body shape (`{"error": "..."}`) for every failure path
//! - JSON encoding with an explicit, fallible step so callers can map failures
//!
//! # Design Decisions
//! - Error messages form a small fixed vocabulary; causes go to spans and logs

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body returned on every failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build a JSON error response.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Serialize `value` as the JSON body of a `status` response.
pub fn encode_json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, serde_json::Error> {
    let body = serde_json::to_vec(value)?;
    Ok((
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}
