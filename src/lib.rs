//! CEP weather services library.
//!
//! Two services share this crate:
//! - the weather service (`GET /weather?cep=`) resolves a Brazilian postal code to a
//!   city through ViaCEP, fetches the current temperature from WeatherAPI and answers
//!   in Celsius, Fahrenheit and Kelvin;
//! - the input service (`POST /`) validates a code and relays it to the weather
//!   service, propagating trace context across the hop.

pub mod cep;
pub mod config;
pub mod enrichment;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
