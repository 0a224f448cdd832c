//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by the input and weather services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Collaborators used by the weather (enrichment) service.
    pub enrichment: EnrichmentConfig,

    /// Downstream settings used by the input service.
    pub relay: RelayConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Locality resolver and weather lookup endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// ViaCEP base URL; requests go to `{base}/ws/{cep}/json/`.
    pub viacep_base_url: String,

    /// WeatherAPI base URL; requests go to `{base}/current.json`.
    pub weather_api_base_url: String,

    /// WeatherAPI key. Never logged.
    pub weather_api_key: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            viacep_base_url: "https://viacep.com.br".to_string(),
            weather_api_base_url: "http://api.weatherapi.com/v1".to_string(),
            weather_api_key: String::new(),
        }
    }
}

/// Input service relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Full URL of the weather service endpoint (`cep` is appended as a query parameter).
    pub downstream_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            downstream_url: "http://localhost:8080/weather".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Service name reported on exported spans. Filled per subcommand when empty.
    pub service_name: String,

    /// Export spans over OTLP/gRPC.
    pub otlp_enabled: bool,

    /// OTLP collector endpoint.
    pub otlp_endpoint: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            service_name: String::new(),
            otlp_enabled: false,
            otlp_endpoint: "http://otel-collector:4317".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Apply environment-style overrides from `lookup`.
    ///
    /// Empty values are ignored, matching how unset variables behave.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.listener.bind_address = format!("0.0.0.0:{}", port.trim());
        }
        if let Some(url) = get("SERVICE_B_URL") {
            self.relay.downstream_url = url;
        }
        if let Some(key) = get("WEATHER_API_KEY") {
            self.enrichment.weather_api_key = key;
        }
        if let Some(url) = get("VIACEP_BASE_URL") {
            self.enrichment.viacep_base_url = url;
        }
        if let Some(url) = get("WEATHER_API_BASE_URL") {
            self.enrichment.weather_api_base_url = url;
        }
        if let Some(endpoint) = get("OTEL_EXPORTER_OTLP_ENDPOINT") {
            self.observability.otlp_endpoint = endpoint;
            self.observability.otlp_enabled = true;
        }
        if let Some(name) = get("OTEL_SERVICE_NAME") {
            self.observability.service_name = name;
        }
    }
}
