use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{WeatherConfig, WeatherLocation},
    weather::dto::{ProviderResponse, WeatherSnapshot},
};

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed weather response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of current conditions for the configured location.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self) -> Result<WeatherSnapshot, WeatherError>;
}

/// OpenWeatherMap client. Every call goes upstream; nothing is cached.
#[derive(Clone, Debug)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    location: WeatherLocation,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("build weather http client")?;
        Ok(Self {
            http,
            url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            location: config.location.clone(),
        })
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = match &self.location {
            WeatherLocation::City(city) => vec![("q", city.clone())],
            WeatherLocation::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));
        query
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self) -> Result<WeatherSnapshot, WeatherError> {
        let res = self.http.get(&self.url).query(&self.query()).send().await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(WeatherError::Status { status, body });
        }

        let parsed: ProviderResponse = serde_json::from_str(&body)?;
        let snapshot = WeatherSnapshot::from(parsed);
        debug!(?snapshot, "weather fetched");
        Ok(snapshot)
    }
}
