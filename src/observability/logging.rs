//! Structured logging.
//!
//! # Responsibilities
//! - Build the log filter from `RUST_LOG` or the configured level
//! - Provide the human-readable fmt layer
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the config file so operators can raise verbosity per run

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(level: &str) -> String {
    format!("cep_weather={level},tower_http={level}")
}

/// Build the filter for the subscriber.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into())
}
