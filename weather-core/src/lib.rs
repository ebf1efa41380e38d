//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Credential loading and on-disk configuration
//! - The provider abstraction and the OpenWeatherMap client
//! - Unit selection and report formatting
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod credential;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;

pub use config::Config;
pub use credential::{API_KEY_ENV, ApiKey};
pub use error::WeatherError;
pub use model::Units;
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use report::WeatherReport;
