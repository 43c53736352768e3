//! Reverse geocoding for venue pins.
//!
//! Talks to a Google-Geocoding-compatible endpoint. Response parsing lives in
//! `parse_reverse_response` so it can be tested without the network.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::error::AppError;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoding is not configured")]
    NotConfigured,
    #[error("Failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("Geocoding request failed: {0}")]
    Request(String),
    #[error("Geocoding service returned {status}: {message}")]
    Api { status: String, message: String },
    #[error("Failed to parse geocoding response: {0}")]
    Parse(String),
}

impl From<GeocodingError> for AppError {
    fn from(error: GeocodingError) -> Self {
        AppError::ExternalService(error.to_string())
    }
}

#[derive(Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeocodingClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, GeocodingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeocodingError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GeocodingError> {
        Self::new(
            config.geocoding_base_url.clone(),
            config.geocoding_api_key.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Formatted address of the first result, `None` when nothing is there.
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>, GeocodingError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodingError::NotConfigured)?;
        let url = format!("{}/maps/api/geocode/json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("latlng", format!("{},{}", lat, lng)), ("key", api_key.to_string())])
            .send()
            .await
            .map_err(|e| GeocodingError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeocodingError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodingError::Api {
                status: status.as_u16().to_string(),
                message: text,
            });
        }

        parse_reverse_response(&text)
    }
}

#[derive(Deserialize)]
struct ReverseResponse {
    status: String,
    #[serde(default)]
    results: Vec<ReverseResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ReverseResult {
    formatted_address: String,
}

pub fn parse_reverse_response(json: &str) -> Result<Option<String>, GeocodingError> {
    let response: ReverseResponse =
        serde_json::from_str(json).map_err(|e| GeocodingError::Parse(e.to_string()))?;

    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .next()
            .map(|result| result.formatted_address)),
        "ZERO_RESULTS" => Ok(None),
        _ => Err(GeocodingError::Api {
            message: response.error_message.unwrap_or_default(),
            status: response.status,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_takes_first_address() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"formatted_address": "Jl. Senayan No.1, Jakarta"},
                {"formatted_address": "Jakarta, Indonesia"}
            ]
        }"#;

        assert_eq!(
            parse_reverse_response(json).unwrap(),
            Some("Jl. Senayan No.1, Jakarta".to_string())
        );
    }

    #[test]
    fn test_parse_zero_results() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        assert_eq!(parse_reverse_response(json).unwrap(), None);
    }

    #[test]
    fn test_parse_denied_is_error() {
        let json = r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#;
        match parse_reverse_response(json) {
            Err(GeocodingError::Api { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            parse_reverse_response("not json"),
            Err(GeocodingError::Parse(_))
        ));
    }

    #[actix_rt::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = GeocodingClient::new("http://localhost:1".to_string(), None).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.reverse(-6.2, 106.8).await,
            Err(GeocodingError::NotConfigured)
        ));
    }
}
