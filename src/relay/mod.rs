//! Input service: validate and relay.
//!
//! # Data Flow
//! ```text
//! POST / {"cep": "..."}
//!     → handler.rs (decode body, normalizing CEP check)
//!     → client.rs (GET weather service, trace context injected)
//!     → downstream status + body returned unchanged
//! ```
//!
//! # Design Decisions
//! - Downstream responses are never re-encoded
//! - Transport failures interpolate the cause into the error message

pub mod client;
pub mod handler;

pub use client::{DownstreamResponse, EnrichmentClient};
pub use handler::{relay_handler, RelayError, RelayState};
