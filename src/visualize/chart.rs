//! Renderer-independent chart descriptions.
//!
//! Builders in this module only decide *what* is drawn. Drawing is done by
//! [`crate::visualize::plot`] when the `plotting` feature is enabled, or by
//! whatever UI the caller hosts.

use crate::types::parameter::AirQualityLevel;
use chrono::{DateTime, Utc};

/// Placeholder text for charts without data.
pub const NO_DATA_MESSAGE: &str = "No current data available";

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// Nothing to plot; the UI shows `message` instead.
    NoData { message: String },
    /// One line per parameter.
    TimeSeries(Vec<LineSeries>),
    /// One bar per parameter.
    Bars(Vec<Bar>),
}

/// A single line of a time-series chart. Points are in ascending time order
/// and skip timestamps where the parameter has no reading.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub parameter: String,
    pub label: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub parameter: String,
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    /// Text printed on the bar, e.g. `12.30 µg/m³`.
    pub annotation: String,
    pub level: AirQualityLevel,
}

impl Chart {
    pub(crate) fn no_data(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            body: ChartBody::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            },
        }
    }

    pub fn has_data(&self) -> bool {
        !matches!(self.body, ChartBody::NoData { .. })
    }
}
