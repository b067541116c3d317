//! Defines the resolved monitoring site ([`Location`]) and the sensors it hosts.

use serde::{Deserialize, Serialize};

/// A monitoring site resolved from a city name.
///
/// Locations are created by [`crate::AirQuality::resolve_location`] and only
/// live for the fetch that uses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Identifier assigned by the API (opaque to this crate).
    pub id: i64,
    /// Display name of the site.
    pub name: String,
    /// City or locality the site belongs to, if the API reports one.
    pub locality: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country_code: String,
    /// Sensors installed at the site.
    pub sensors: Vec<Sensor>,
}

/// One sensor of a [`Location`], measuring a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: i64,
    /// Parameter code, e.g. `pm25`.
    pub parameter: String,
    /// Unit the sensor reports in, e.g. `µg/m³`.
    pub unit: String,
}

impl Location {
    /// Name shown to users: the locality when known, otherwise the site name.
    pub fn display_name(&self) -> &str {
        self.locality.as_deref().unwrap_or(&self.name)
    }

    pub fn sensor(&self, sensor_id: i64) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == sensor_id)
    }
}
