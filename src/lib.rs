mod air_quality;
mod config;
mod error;
mod fetcher;
mod processing;
mod types;
mod utils;
mod visualize;

pub use air_quality::*;
pub use config::*;
pub use error::{AirQualityError, ConfigError};

pub use fetcher::error::{FetchError, TransientFailure};

pub use processing::error::RecordError;
pub use processing::latest::latest_per_parameter;
pub use processing::pivot::pivot;
pub use processing::process::process;
pub use processing::statistics::*;

pub use types::latest::*;
pub use types::location::*;
pub use types::measurement_table::*;
pub use types::parameter::*;
pub use types::pivoted_series::PivotedSeries;
pub use types::raw_measurement::*;

pub use visualize::bar::build_bar_chart;
pub use visualize::chart::*;
pub use visualize::labels::format_parameter_label;
#[cfg(feature = "plotting")]
pub use visualize::plot;
pub use visualize::time_series::build_time_series_chart;
