//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional) via loader.rs
//!     → environment overrides (PORT, SERVICE_B_URL, WEATHER_API_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → cloned into each service's state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, resolve_config_with, ConfigError};
pub use schema::{EnrichmentConfig, ListenerConfig, ObservabilityConfig, RelayConfig, ServiceConfig};
pub use validation::{validate_config, ValidationError};
