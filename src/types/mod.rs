pub mod latest;
pub mod location;
pub mod measurement_table;
pub mod parameter;
pub mod pivoted_series;
pub mod raw_measurement;
