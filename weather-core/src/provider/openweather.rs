use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    credential::ApiKey,
    error::{Result, WeatherError},
    model::Units,
};

use super::WeatherProvider;

pub const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { endpoint: CURRENT_WEATHER_URL.to_string(), http })
    }

    /// Point the provider at a different current-weather URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str, api_key: &ApiKey, units: Units) -> Result<Value> {
        debug!(city, %units, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key.as_str()), ("units", units.api_token())])
            .send()
            .await
            // The URL carries `appid`; keep it out of messages and logs.
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        debug!(%status, "OpenWeather responded");

        // 404 and 401 get their own errors before the generic status check.
        match status {
            StatusCode::NOT_FOUND => return Err(WeatherError::CityNotFound),
            StatusCode::UNAUTHORIZED => return Err(WeatherError::InvalidCredential),
            s if !s.is_success() => {
                warn!(status = %s, city, "OpenWeather request failed");
                return Err(WeatherError::Http { status: s });
            }
            _ => {}
        }

        let body = res.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))
    }
}
