//! Wire types and error definitions for the weather pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Locality resolver (ViaCEP) response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocalityInfo {
    /// City name.
    #[serde(rename = "localidade", default)]
    pub name: String,

    /// Set when the resolver does not know the code.
    #[serde(rename = "erro", default)]
    pub error_flag: Option<ErrorFlag>,
}

/// ViaCEP documents `erro` as a string, the live API sends a boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorFlag {
    Text(String),
    Bool(bool),
}

impl LocalityInfo {
    /// Whether the resolver flagged the code as unknown.
    pub fn is_not_found(&self) -> bool {
        match &self.error_flag {
            Some(ErrorFlag::Text(flag)) => flag.eq_ignore_ascii_case("true"),
            Some(ErrorFlag::Bool(flag)) => *flag,
            None => false,
        }
    }
}

/// Weather lookup (WeatherAPI) response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherApiResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
}

/// Current temperature for a locality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
}

impl From<WeatherApiResponse> for WeatherReading {
    fn from(response: WeatherApiResponse) -> Self {
        Self {
            temperature_celsius: response.current.temp_c,
        }
    }
}

/// Client-facing result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherResponse {
    /// Fahrenheit is `C * 1.8 + 32`; Kelvin uses an offset of 273.0, not 273.15.
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            temp_c: celsius,
            temp_f: celsius * 1.8 + 32.0,
            temp_k: celsius + 273.0,
        }
    }
}

/// Errors from the locality resolver.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("locality resolver request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("postal code not found: {0}")]
    NotFound(String),

    #[error("invalid locality resolver response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ResolutionError {
    /// Metric label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode",
        }
    }
}

/// Errors from the weather lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather not found for '{0}'")]
    NotFound(String),

    #[error("invalid weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LookupError {
    /// Metric label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let r = WeatherResponse::from_celsius(17.1);
        assert_eq!(r.temp_c, 17.1);
        assert_eq!(r.temp_f, 17.1 * 1.8 + 32.0);
        assert_eq!(r.temp_k, 17.1 + 273.0);

        let freezing = WeatherResponse::from_celsius(0.0);
        assert_eq!(freezing.temp_f, 32.0);
        assert_eq!(freezing.temp_k, 273.0);

        let cold = WeatherResponse::from_celsius(-40.0);
        assert_eq!(cold.temp_f, -40.0);
        assert_eq!(cold.temp_k, 233.0);
    }

    #[test]
    fn test_weather_response_json() {
        let body = serde_json::to_string(&WeatherResponse::from_celsius(17.1)).unwrap();
        assert_eq!(body, r#"{"temp_C":17.1,"temp_F":62.78,"temp_K":290.1}"#);
    }

    #[test]
    fn test_locality_found() {
        let info: LocalityInfo = serde_json::from_str(r#"{"cep":"89053-300","localidade":"Blumenau","uf":"SC"}"#).unwrap();
        assert_eq!(info.name, "Blumenau");
        assert!(!info.is_not_found());
    }

    #[test]
    fn test_locality_error_flag() {
        for body in [r#"{"erro":"true"}"#, r#"{"erro":"TRUE"}"#, r#"{"erro":"True"}"#, r#"{"erro":true}"#] {
            let info: LocalityInfo = serde_json::from_str(body).unwrap();
            assert!(info.is_not_found(), "{body}");
            assert_eq!(info.name, "");
        }
        for body in [r#"{"localidade":"X","erro":"false"}"#, r#"{"localidade":"X","erro":false}"#, r#"{"localidade":"X","erro":null}"#] {
            let info: LocalityInfo = serde_json::from_str(body).unwrap();
            assert!(!info.is_not_found(), "{body}");
        }
    }

    #[test]
    fn test_locality_wrong_shape() {
        assert!(serde_json::from_str::<LocalityInfo>(r#"{"localidade":42}"#).is_err());
        assert!(serde_json::from_str::<LocalityInfo>("<html>").is_err());
    }

    #[test]
    fn test_weather_api_response() {
        let reading: WeatherReading = serde_json::from_str::<WeatherApiResponse>(
            r#"{"location":{"name":"Blumenau"},"current":{"temp_c":17.1,"temp_f":62.8}}"#,
        )
        .unwrap()
        .into();
        assert_eq!(reading.temperature_celsius, 17.1);

        assert!(serde_json::from_str::<WeatherApiResponse>(r#"{"current":{}}"#).is_err());
        assert!(serde_json::from_str::<WeatherApiResponse>(r#"{"error":{"code":1006}}"#).is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ResolutionError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(LookupError::NotFound("x".into()).kind(), "not_found");
        let decode = serde_json::from_str::<WeatherApiResponse>("{").unwrap_err();
        assert_eq!(LookupError::from(decode).kind(), "decode");
    }
}
