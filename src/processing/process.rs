use crate::processing::error::RecordError;
use crate::types::measurement_table::{Measurement, MeasurementTable};
use crate::types::raw_measurement::{RawMeasurement, RawValue};
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Validates raw records into a [`MeasurementTable`].
///
/// Each record is checked on its own: a record whose timestamp doesn't parse to
/// an absolute instant, whose value isn't a finite number, that has no
/// parameter, or that belongs to a different location than the first accepted
/// record is dropped, and processing continues with the next one. Parameter and
/// unit are copied verbatim. Row order is the input order.
///
/// This never fails: an empty or fully malformed input gives an empty table.
///
/// # Examples
///
/// ```
/// use air_quality::{process, RawMeasurement, RawValue};
///
/// let raw = vec![
///     RawMeasurement {
///         parameter: Some("pm25".into()),
///         value: RawValue::from("12.3"),
///         unit: Some("µg/m³".into()),
///         timestamp: Some("2024-01-01T10:00:00Z".into()),
///         location_id: 7,
///         sensor_id: None,
///     },
///     RawMeasurement {
///         parameter: Some("pm25".into()),
///         value: RawValue::from("not-a-number"),
///         unit: None,
///         timestamp: Some("2024-01-01T11:00:00Z".into()),
///         location_id: 7,
///         sensor_id: None,
///     },
/// ];
///
/// let table = process(&raw);
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.rows()[0].value, 12.3);
/// ```
pub fn process(raw_measurements: &[RawMeasurement]) -> MeasurementTable {
    let mut location_id: Option<i64> = None;
    let mut rows = Vec::with_capacity(raw_measurements.len());
    let mut dropped = 0usize;

    for raw in raw_measurements {
        match validate(raw, location_id) {
            Ok(row) => {
                location_id.get_or_insert(raw.location_id);
                rows.push(row);
            }
            Err(e) => {
                dropped += 1;
                debug!("Dropping record from location {}: {}", raw.location_id, e);
            }
        }
    }

    if dropped > 0 {
        info!(
            "Processed {} records: {} kept, {} dropped as malformed",
            raw_measurements.len(),
            rows.len(),
            dropped
        );
    }
    MeasurementTable::new(location_id, rows)
}

fn validate(raw: &RawMeasurement, location_id: Option<i64>) -> Result<Measurement, RecordError> {
    if let Some(expected) = location_id {
        if raw.location_id != expected {
            return Err(RecordError::ForeignLocation {
                expected,
                found: raw.location_id,
            });
        }
    }
    let parameter = raw
        .parameter
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or(RecordError::MissingParameter)?;
    let timestamp = parse_timestamp(raw.timestamp.as_deref())?;
    let value = coerce_value(&raw.value)?;

    Ok(Measurement {
        timestamp,
        parameter: parameter.to_string(),
        value,
        unit: raw.unit.clone().unwrap_or_default(),
    })
}

/// Parses an RFC 3339 timestamp (or the same with a space separator) into UTC.
/// Timestamps without an offset are rejected: they don't name an instant.
pub(crate) fn parse_timestamp(text: Option<&str>) -> Result<DateTime<Utc>, RecordError> {
    let text = text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RecordError::MissingTimestamp)?;
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RecordError::InvalidTimestamp(text.to_string()))
}

pub(crate) fn coerce_value(value: &RawValue) -> Result<f64, RecordError> {
    let number = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::NonNumericValue(text.clone()))?,
        RawValue::Missing => return Err(RecordError::MissingValue),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(RecordError::NonFiniteValue(number))
    }
}
