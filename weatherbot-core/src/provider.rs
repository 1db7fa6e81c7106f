use crate::{
    Config,
    error::{LookupError, LookupResult},
    model::{AirQualitySnapshot, ForecastSnapshot, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";

/// Read-only weather lookups used by the command layer and the daily alert.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> LookupResult<WeatherSnapshot>;

    async fn fetch_forecast(&self, city: &str) -> LookupResult<ForecastSnapshot>;

    async fn fetch_air_quality(&self, city: &str) -> LookupResult<AirQualitySnapshot>;
}

/// Status and body of one provider response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues GET requests against the provider's base URL.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> LookupResult<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> LookupResult<RawResponse> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        base_url,
    )))
}

pub(crate) fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
