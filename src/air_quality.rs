//! The main entry point: an [`AirQuality`] client that resolves cities,
//! fetches their current measurements and assembles everything a UI needs to
//! show them.

use crate::config::{ApiKey, FetchConfig};
use crate::error::AirQualityError;
use crate::fetcher::api_client::ApiClient;
use crate::fetcher::error::FetchError;
use crate::fetcher::{locations, measurements};
use crate::processing::latest::latest_per_parameter;
use crate::processing::pivot::pivot;
use crate::processing::process::process;
use crate::processing::statistics::{parameter_statistics, ParameterStatistics};
use crate::types::latest::LatestMeasurements;
use crate::types::location::Location;
use crate::types::measurement_table::{csv_file_name, MeasurementTable};
use crate::types::pivoted_series::PivotedSeries;
use crate::types::raw_measurement::RawMeasurement;
use crate::visualize::bar::build_bar_chart;
use crate::visualize::chart::Chart;
use crate::visualize::time_series::build_time_series_chart;
use bon::bon;
use log::info;

/// Outcome of [`AirQuality::report`].
///
/// Only genuine failures (configuration, credentials, network) are errors.
/// An unknown city or a city without current readings are ordinary outcomes
/// the UI shows as a "no data" state.
#[derive(Debug, Clone)]
pub enum CityReport {
    LocationNotFound { city: String, country: String },
    NoCurrentData { location: Location },
    Ready(Box<AirQualityReport>),
}

/// Everything derived from one city's current measurements.
#[derive(Debug, Clone)]
pub struct AirQualityReport {
    pub location: Location,
    pub table: MeasurementTable,
    pub latest: LatestMeasurements,
    pub pivoted: PivotedSeries,
    pub statistics: Vec<ParameterStatistics>,
    pub time_series_chart: Chart,
    pub bar_chart: Chart,
}

impl AirQualityReport {
    /// File name to offer for the CSV download of [`AirQualityReport::table`].
    pub fn csv_file_name(&self) -> String {
        csv_file_name(self.location.display_name())
    }
}

/// Client for the OpenAQ v3 API.
///
/// Holds the credential and the [`FetchConfig`]; nothing else is kept between
/// calls.
///
/// ```rust,no_run
/// # use air_quality::{AirQuality, AirQualityError, CityReport};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AirQualityError> {
/// let client = AirQuality::new()?;
/// match client.report().city("São Paulo").call().await? {
///     CityReport::Ready(report) => println!("{} rows", report.table.len()),
///     other => println!("{:?}", other),
/// }
/// # Ok(())
/// # }
/// ```
pub struct AirQuality {
    client: ApiClient,
}

#[bon]
impl AirQuality {
    /// Creates a client with the default configuration, reading the API key
    /// from the `OPENAQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// [`AirQualityError::Config`] if the variable is missing or blank. No
    /// request is made.
    pub fn new() -> Result<Self, AirQualityError> {
        Self::with_config(FetchConfig::default())
    }

    /// Like [`AirQuality::new`], with a custom configuration.
    pub fn with_config(config: FetchConfig) -> Result<Self, AirQualityError> {
        Self::with_api_key(ApiKey::from_env()?, config)
    }

    pub fn with_api_key(api_key: ApiKey, config: FetchConfig) -> Result<Self, AirQualityError> {
        Ok(Self {
            client: ApiClient::new(api_key, config)?,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        self.client.config()
    }

    /// Resolves a city name to a monitoring location.
    ///
    /// * `.city(&str)`: **Required.**
    /// * `.country(&str)`: Optional ISO code. Defaults to [`FetchConfig::country`].
    ///
    /// # Errors
    ///
    /// [`FetchError::LocationNotFound`] (or `CountryNotFound`) when nothing
    /// matches. Check [`AirQualityError::is_no_data`] to tell these apart from
    /// failures.
    #[builder]
    pub async fn resolve_location(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<Location, AirQualityError> {
        let country = country.unwrap_or(&self.client.config().country);
        Ok(locations::resolve_location(&self.client, city, country).await?)
    }

    /// Fetches up to `limit` current raw records of `location`, as received.
    ///
    /// * `.location(&Location)`: **Required.**
    /// * `.limit(usize)`: Optional. Defaults to [`FetchConfig::limit`]; must not be zero.
    ///
    /// # Errors
    ///
    /// [`FetchError::EmptyResult`] if the location has no current data.
    #[builder]
    pub async fn fetch_measurements(
        &self,
        location: &Location,
        limit: Option<usize>,
    ) -> Result<Vec<RawMeasurement>, AirQualityError> {
        let limit = self.effective_limit(limit)?;
        Ok(measurements::fetch_measurements(&self.client, location, limit).await?)
    }

    /// Lists up to [`FetchConfig::max_cities`] city names of `country` that
    /// currently report data, sorted alphabetically.
    ///
    /// * `.country(&str)`: Optional ISO code. Defaults to [`FetchConfig::country`].
    #[builder]
    pub async fn list_available_cities(
        &self,
        country: Option<&str>,
    ) -> Result<Vec<String>, AirQualityError> {
        let country = country.unwrap_or(&self.client.config().country);
        Ok(locations::list_available_cities(&self.client, country).await?)
    }

    /// Runs the whole pipeline for one city: resolve, fetch, process, derive
    /// the views and build both charts.
    ///
    /// * `.city(&str)`: **Required.**
    /// * `.country(&str)`: Optional. Defaults to [`FetchConfig::country`].
    /// * `.limit(usize)`: Optional. Defaults to [`FetchConfig::limit`].
    ///
    /// Measurements are never requested when the city can't be resolved.
    #[builder]
    pub async fn report(
        &self,
        city: &str,
        country: Option<&str>,
        limit: Option<usize>,
    ) -> Result<CityReport, AirQualityError> {
        let country = country.unwrap_or(&self.client.config().country);
        let limit = self.effective_limit(limit)?;

        let location = match locations::resolve_location(&self.client, city, country).await {
            Ok(location) => location,
            Err(FetchError::LocationNotFound { .. } | FetchError::CountryNotFound { .. }) => {
                return Ok(CityReport::LocationNotFound {
                    city: city.to_string(),
                    country: country.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let raw = match measurements::fetch_measurements(&self.client, &location, limit).await {
            Ok(raw) => raw,
            Err(FetchError::EmptyResult { .. }) => {
                return Ok(CityReport::NoCurrentData { location });
            }
            Err(e) => return Err(e.into()),
        };

        let table = process(&raw);
        if table.is_empty() {
            info!(
                "All {} records of location {} were malformed",
                raw.len(),
                location.id
            );
            return Ok(CityReport::NoCurrentData { location });
        }

        let latest = latest_per_parameter(&table);
        let pivoted = pivot(&table);
        let statistics = parameter_statistics(&table)?;
        let name = location.display_name();
        let time_series_chart =
            build_time_series_chart(&pivoted, &format!("Air quality trends in {name}"));
        let bar_chart = build_bar_chart(&latest, &format!("Current air quality in {name}"));

        Ok(CityReport::Ready(Box::new(AirQualityReport {
            location,
            table,
            latest,
            pivoted,
            statistics,
            time_series_chart,
            bar_chart,
        })))
    }

    fn effective_limit(&self, limit: Option<usize>) -> Result<usize, AirQualityError> {
        match limit {
            Some(0) => Err(crate::error::ConfigError::Invalid {
                field: "limit",
                reason: "must be greater than zero".to_string(),
            }
            .into()),
            Some(limit) => Ok(limit),
            None => Ok(self.client.config().limit),
        }
    }
}
