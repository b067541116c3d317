use crate::fetcher::error::FetchError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Problems with the client setup, detected before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not set: environment variable {var} is missing or empty")]
    MissingApiKey { var: String },

    #[error("API key must not be blank")]
    BlankApiKey,

    #[error("Invalid configuration for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to build data frame")]
    DataFrame(#[from] PolarsError),
}

impl AirQualityError {
    /// See [`FetchError::is_no_data`].
    pub fn is_no_data(&self) -> bool {
        matches!(self, AirQualityError::Fetch(e) if e.is_no_data())
    }
}
