//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, root span parented on inbound trace context)
//!     → enrichment / relay handlers
//!     → response.rs (JSON bodies, error shape)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{json_error, ErrorResponse};
pub use server::{enrichment_router, relay_router, HttpServer};
