//! Response envelopes of the OpenAQ v3 API.

use crate::types::location::{Location, Sensor};
use serde::Deserialize;

/// The `{ "meta": ..., "results": [...] }` envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCountry {
    pub id: i64,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLocation {
    pub id: i64,
    pub name: Option<String>,
    pub locality: Option<String>,
    pub country: Option<WireCountryRef>,
    #[serde(default)]
    pub sensors: Vec<WireSensor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCountryRef {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSensor {
    pub id: i64,
    pub parameter: Option<WireParameter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireParameter {
    pub name: Option<String>,
    pub units: Option<String>,
}

impl WireLocation {
    /// Names a city could be matched against: locality first, then site name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locality
            .as_deref()
            .into_iter()
            .chain(self.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// The city this location belongs to, as listed to users.
    pub fn city(&self) -> Option<&str> {
        self.names().next()
    }

    pub fn into_location(self, requested_country: &str) -> Location {
        let country_code = self
            .country
            .and_then(|c| c.code)
            .unwrap_or_else(|| requested_country.to_uppercase());
        let sensors = self
            .sensors
            .into_iter()
            .filter_map(|sensor| {
                let parameter = sensor.parameter?;
                Some(Sensor {
                    id: sensor.id,
                    parameter: parameter.name?,
                    unit: parameter.units.unwrap_or_default(),
                })
            })
            .collect();
        Location {
            id: self.id,
            name: self.name.unwrap_or_default(),
            locality: self.locality,
            country_code,
            sensors,
        }
    }
}
