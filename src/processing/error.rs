use thiserror::Error;

/// Why a single raw record was left out of a [`crate::MeasurementTable`].
///
/// These never abort processing; they only describe a dropped row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Record has no parameter")]
    MissingParameter,

    #[error("Record has no timestamp")]
    MissingTimestamp,

    #[error("Timestamp '{0}' is not an RFC 3339 instant with an offset")]
    InvalidTimestamp(String),

    #[error("Record has no value")]
    MissingValue,

    #[error("Value '{0}' is not numeric")]
    NonNumericValue(String),

    #[error("Value {0} is not finite")]
    NonFiniteValue(f64),

    #[error("Record belongs to location {found}, table holds location {expected}")]
    ForeignLocation { expected: i64, found: i64 },
}
