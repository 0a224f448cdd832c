//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that collaborator URLs are absolute http(s) URLs
//! - Check that bind addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_url(&mut errors, "enrichment.viacep_base_url", &config.enrichment.viacep_base_url);
    check_url(
        &mut errors,
        "enrichment.weather_api_base_url",
        &config.enrichment.weather_api_base_url,
    );
    check_url(&mut errors, "relay.downstream_url", &config.relay.downstream_url);

    if config.observability.otlp_enabled {
        check_url(&mut errors, "observability.otlp_endpoint", &config.observability.otlp_endpoint);
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let reason = match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return,
        Ok(url) => format!("unsupported scheme '{}'", url.scheme()),
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    });
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
