//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (OpenTelemetry spans, OTLP export)
//!     → propagation.rs (W3C trace-context + baggage across the service hop)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OTLP collector (optional)
//! ```
//!
//! # Design Decisions
//! - Spans are created with the `tracing` macros; the OpenTelemetry layer mirrors them
//! - Span contexts exist even when export is disabled, so propagation always works
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod telemetry;

pub use propagation::{inject_context, set_parent_from_headers};
pub use telemetry::{init_telemetry, record_error, TelemetryError, TelemetryGuard};
