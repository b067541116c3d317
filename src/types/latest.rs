//! The "latest measurement per parameter" view.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// The most recent reading of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}

/// At most one [`LatestReading`] per parameter code.
///
/// Built by [`crate::latest_per_parameter`]. Iteration is alphabetical by
/// parameter code; display code that needs the canonical pollutant order
/// should use [`LatestMeasurements::iter_canonical`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestMeasurements {
    readings: BTreeMap<String, LatestReading>,
}

impl LatestMeasurements {
    pub(crate) fn from_map(readings: BTreeMap<String, LatestReading>) -> Self {
        Self { readings }
    }

    pub fn get(&self, parameter: &str) -> Option<&LatestReading> {
        self.readings.get(parameter)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LatestReading)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries ordered by [`crate::compare_parameters`].
    pub fn iter_canonical(&self) -> impl Iterator<Item = (&str, &LatestReading)> {
        let mut entries: Vec<(&str, &LatestReading)> = self.iter().collect();
        entries.sort_by(|a, b| crate::types::parameter::compare_parameters(a.0, b.0));
        entries.into_iter()
    }
}
