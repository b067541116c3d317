pub mod bar;
pub mod chart;
pub mod labels;
#[cfg(feature = "plotting")]
pub mod plot;
pub mod time_series;
