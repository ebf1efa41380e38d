use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{credential::ApiKey, error::Result, model::Units};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current-weather data.
///
/// The credential travels with every call; providers hold no key of their own.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city` and return the provider's JSON
    /// body untouched.
    async fn current_weather(&self, city: &str, api_key: &ApiKey, units: Units) -> Result<Value>;
}
