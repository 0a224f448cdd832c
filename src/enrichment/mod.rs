//! Weather (enrichment) service.
//!
//! # Data Flow
//! ```text
//! GET /weather?cep=...
//!     → handler.rs (strict CEP check)
//!     → locality.rs (ViaCEP: cep → city)
//!     → weather.rs (WeatherAPI: city → temp_c)
//!     → types.rs (°C → °F, K)
//!     → JSON response
//! ```
//!
//! # Design Decisions
//! - Collaborator clients are injected through Axum state, never globals
//! - Every collaborator failure collapses to a fixed 404 message; causes are recorded on spans
//! - Single attempt per collaborator call

pub mod handler;
pub mod locality;
pub mod types;
pub mod weather;

pub use handler::{enrich, weather_handler, EnrichmentError, EnrichmentState};
pub use locality::LocalityResolver;
pub use types::{LocalityInfo, LookupError, ResolutionError, WeatherReading, WeatherResponse};
pub use weather::WeatherLookup;
