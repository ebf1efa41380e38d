use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between reading the credential and
/// getting a JSON body back from the provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No usable API key; fatal before the session starts.
    #[error("{0}")]
    Configuration(String),

    #[error("City not found.")]
    CityNotFound,

    #[error("Invalid API key.")]
    InvalidCredential,

    #[error("HTTP error: {status}")]
    Http { status: StatusCode },

    /// Timeouts, DNS failures, refused connections.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse weather response: {0}")]
    Decode(String),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_render_short_messages() {
        assert_eq!(WeatherError::CityNotFound.to_string(), "City not found.");
        assert_eq!(WeatherError::InvalidCredential.to_string(), "Invalid API key.");

        let err = WeatherError::Http { status: StatusCode::INTERNAL_SERVER_ERROR };
        assert_eq!(err.to_string(), "HTTP error: 500 Internal Server Error");
    }
}
