//! Configuration for talking to the OpenAQ v3 API: the explicit set of request
//! parameters (country, limits, paging, retry policy) and the API credential.

use crate::error::ConfigError;
use bon::Builder;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the OpenAQ API key.
pub const API_KEY_ENV_VAR: &str = "OPENAQ_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openaq.org/v3";
pub const DEFAULT_COUNTRY: &str = "BR";
pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Request parameters shared by every call of an [`crate::AirQuality`] client.
///
/// All fields have defaults, so only the ones that matter need to be set:
///
/// ```
/// use air_quality::FetchConfig;
/// use std::time::Duration;
///
/// let config = FetchConfig::builder()
///     .country("PT")
///     .limit(250)
///     .request_timeout(Duration::from_secs(5))
///     .build();
///
/// assert_eq!(config.country, "PT");
/// assert_eq!(config.page_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FetchConfig {
    /// Root of the API, without a trailing slash.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// ISO 3166 alpha-2 code used when a call doesn't name a country.
    #[builder(into, default = DEFAULT_COUNTRY.to_string())]
    pub country: String,
    /// Maximum number of measurements returned by one fetch.
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: usize,
    /// Number of records requested per page.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Upper bound on the number of location pages scanned for a city.
    #[builder(default = 30)]
    pub max_location_pages: u32,
    /// Timeout applied to every single HTTP request.
    #[builder(default = Duration::from_secs(15))]
    pub request_timeout: Duration,
    /// Total attempts (first try included) for timeouts, connection failures and 5xx.
    #[builder(default = 3)]
    pub max_attempts: u32,
    /// Delay before the first retry, doubled on each following one.
    #[builder(default = Duration::from_millis(250))]
    pub retry_backoff: Duration,
    /// Maximum number of cities returned by a city listing.
    #[builder(default = 10)]
    pub max_cities: usize,
    /// Maximum number of candidate cities probed for current data while listing.
    #[builder(default = 15)]
    pub max_cities_checked: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FetchConfig {
    /// Rejects values that would make a fetch meaningless or loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };
        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if self.country.trim().is_empty() {
            return Err(invalid("country", "must not be empty"));
        }
        if self.limit == 0 {
            return Err(invalid("limit", "must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.max_location_pages == 0 {
            return Err(invalid("max_location_pages", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Backoff before retry number `retry` (1-based).
    pub(crate) fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.retry_backoff.saturating_mul(factor)
    }
}

/// The OpenAQ API credential.
///
/// The key is never printed: both `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key obtained out-of-band. Blank keys are rejected.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::BlankApiKey);
        }
        Ok(Self(key.trim().to_string()))
    }

    /// Reads the key from [`API_KEY_ENV_VAR`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEY_ENV_VAR)
    }

    pub fn from_env_var(var: &str) -> Result<Self, ConfigError> {
        match std::env::var(var) {
            Ok(value) => Self::new(value),
            Err(_) => Err(ConfigError::MissingApiKey {
                var: var.to_string(),
            }),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
