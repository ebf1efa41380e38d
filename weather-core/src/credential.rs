use std::{env, fmt};

use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{Result, WeatherError},
};

/// Environment variable holding the OpenWeatherMap key.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

/// OpenWeatherMap API key. Read once at startup and only ever borrowed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Load `.env` if one exists, then resolve the key from the process
    /// environment or the stored config.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env file");
        }

        Self::resolve_with(env::var(API_KEY_ENV).ok(), Config::load)
    }

    /// Like [`ApiKey::resolve`], but the config is only read when the
    /// environment has no key. An unreadable config counts as empty.
    pub fn resolve_with<F>(from_env: Option<String>, load_config: F) -> Result<Self>
    where
        F: FnOnce() -> anyhow::Result<Config>,
    {
        if non_blank(from_env.as_deref()).is_some() {
            return Self::resolve(from_env, &Config::default());
        }

        let config = load_config().unwrap_or_else(|e| {
            let reason = format!("{e:#}");
            warn!(error = %reason, "ignoring unreadable config file");
            Config::default()
        });

        Self::resolve(None, &config)
    }

    /// Pick the first non-blank key: environment first, then config file.
    pub fn resolve(from_env: Option<String>, config: &Config) -> Result<Self> {
        if let Some(key) = non_blank(from_env.as_deref()) {
            debug!(source = "env", "API key found");
            return Ok(Self::new(key));
        }

        if let Some(key) = non_blank(config.api_key.as_deref()) {
            debug!(source = "config", "API key found");
            return Ok(Self::new(key));
        }

        Err(WeatherError::Configuration(format!(
            "No API key found. Please set {API_KEY_ENV} in .env file or run `weather configure`."
        )))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
