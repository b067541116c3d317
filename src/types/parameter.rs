//! Pollutant parameter codes: their canonical display order and the coarse
//! health classification shown next to current readings.

use std::cmp::Ordering;
use std::fmt;

/// Known parameter codes, in the order they are displayed.
///
/// Parameters outside this list are displayed after it, alphabetically.
pub const CANONICAL_PARAMETERS: [&str; 10] =
    ["pm25", "pm10", "pm1", "o3", "no2", "so2", "co", "no", "nox", "bc"];

/// Position of `parameter` in [`CANONICAL_PARAMETERS`], ignoring case.
pub fn canonical_rank(parameter: &str) -> Option<usize> {
    CANONICAL_PARAMETERS
        .iter()
        .position(|known| known.eq_ignore_ascii_case(parameter))
}

/// Total order used wherever parameters are listed: known codes first in
/// canonical order, then unknown codes alphabetically (case-insensitive, with
/// the exact spelling as a final tie-break so distinct codes never compare equal).
pub fn compare_parameters(a: &str, b: &str) -> Ordering {
    match (canonical_rank(a), canonical_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

/// Coarse health rating of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQualityLevel {
    Good,
    Moderate,
    Unhealthy,
    /// No thresholds are known for the parameter.
    Unrated,
}

impl AirQualityLevel {
    /// Rates `value` for `parameter`.
    ///
    /// Thresholds: `pm25` ≤ 12 good, ≤ 35 moderate; `o3` ≤ 100 good, ≤ 160
    /// moderate; anything above is unhealthy. Other parameters are unrated.
    ///
    /// ```
    /// use air_quality::AirQualityLevel;
    ///
    /// assert_eq!(AirQualityLevel::classify("pm25", 8.0), AirQualityLevel::Good);
    /// assert_eq!(AirQualityLevel::classify("PM25", 40.0), AirQualityLevel::Unhealthy);
    /// assert_eq!(AirQualityLevel::classify("no2", 40.0), AirQualityLevel::Unrated);
    /// ```
    pub fn classify(parameter: &str, value: f64) -> Self {
        let (good, moderate) = match parameter.to_ascii_lowercase().as_str() {
            "pm25" => (12.0, 35.0),
            "o3" => (100.0, 160.0),
            _ => return AirQualityLevel::Unrated,
        };
        if value <= good {
            AirQualityLevel::Good
        } else if value <= moderate {
            AirQualityLevel::Moderate
        } else {
            AirQualityLevel::Unhealthy
        }
    }
}

impl fmt::Display for AirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AirQualityLevel::Good => "good",
            AirQualityLevel::Moderate => "moderate",
            AirQualityLevel::Unhealthy => "unhealthy",
            AirQualityLevel::Unrated => "unrated",
        };
        f.write_str(text)
    }
}
