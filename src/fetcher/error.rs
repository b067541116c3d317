use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one attempt that is worth retrying.
#[derive(Debug, Error)]
pub enum TransientFailure {
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed")]
    Connection(#[source] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The API rejected the credential (401/403). Never retried.
    #[error("API key rejected for {url} with status {status}")]
    Unauthorized { url: String, status: StatusCode },

    #[error("Request to {url} failed after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: TransientFailure,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Country '{country}' is not known to the API")]
    CountryNotFound { country: String },

    #[error("No monitoring location found for '{city}' in {country}")]
    LocationNotFound { city: String, country: String },

    #[error("Location {location_id} has no current measurements")]
    EmptyResult { location_id: i64 },
}

impl FetchError {
    /// `true` for the outcomes that only mean "there is nothing to show":
    /// unknown country or city, or a location without data.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            FetchError::CountryNotFound { .. }
                | FetchError::LocationNotFound { .. }
                | FetchError::EmptyResult { .. }
        )
    }

    /// Number of retries performed before giving up, where that applies.
    pub fn retries(&self) -> u32 {
        match self {
            FetchError::RetriesExhausted { attempts, .. } => attempts.saturating_sub(1),
            _ => 0,
        }
    }
}
