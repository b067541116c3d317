//! The unvalidated record handed from the fetcher to the processor.
//!
//! The API returns loosely-shaped JSON. Instead of passing that JSON around,
//! each record is mapped once into a [`RawMeasurement`] whose fields say
//! explicitly what was found. Nothing is validated here: a record with a
//! missing timestamp or a textual value is still a `RawMeasurement`, and it is
//! the processor that decides to drop it.

use crate::types::location::Location;
use serde_json::Value;

/// The value field of a raw record, as received.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    /// Values sent as strings (`"12.3"`, `"not-a-number"`).
    Text(String),
    /// Absent, `null`, or of a type that can't hold a reading (bool, object, array).
    Missing,
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One reading as received from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    pub parameter: Option<String>,
    pub value: RawValue,
    pub unit: Option<String>,
    /// Timestamp text exactly as sent; expected to carry a UTC offset.
    pub timestamp: Option<String>,
    pub location_id: i64,
    pub sensor_id: Option<i64>,
}

impl RawMeasurement {
    /// Maps one JSON result into a raw record.
    ///
    /// Both shapes produced by the API are understood: records that carry the
    /// parameter inline (`parameter.name` / `parameter.units`, or flat strings),
    /// and latest-value records that only reference a sensor through
    /// `sensorsId`, in which case parameter and unit come from the location's
    /// sensor list. The timestamp is read from `datetime.utc`, `date.utc`,
    /// `period.datetimeTo.utc` or a flat `datetime`/`date` string, in that order.
    pub fn from_json(record: &Value, location: &Location) -> Self {
        let sensor_id = record
            .get("sensorsId")
            .or_else(|| record.get("sensorId"))
            .and_then(Value::as_i64);
        let sensor = sensor_id.and_then(|id| location.sensor(id));

        let inline_parameter = record.get("parameter");
        let parameter = inline_parameter
            .and_then(|p| p.get("name").and_then(Value::as_str).or_else(|| p.as_str()))
            .map(str::to_string)
            .or_else(|| sensor.map(|s| s.parameter.clone()));
        let unit = inline_parameter
            .and_then(|p| p.get("units"))
            .or_else(|| record.get("unit"))
            .or_else(|| record.get("units"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| sensor.map(|s| s.unit.clone()));

        let location_id = record
            .get("locationsId")
            .or_else(|| record.get("locationId"))
            .and_then(Value::as_i64)
            .unwrap_or(location.id);

        Self {
            parameter,
            value: raw_value(record.get("value")),
            unit,
            timestamp: timestamp_text(record),
            location_id,
            sensor_id,
        }
    }
}

fn raw_value(value: Option<&Value>) -> RawValue {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
        Some(Value::String(s)) => RawValue::Text(s.clone()),
        _ => RawValue::Missing,
    }
}

fn timestamp_text(record: &Value) -> Option<String> {
    let nested = |outer: &str| {
        record
            .get(outer)
            .and_then(|v| v.get("utc"))
            .and_then(Value::as_str)
    };
    nested("datetime")
        .or_else(|| nested("date"))
        .or_else(|| {
            record
                .get("period")
                .and_then(|p| p.get("datetimeTo"))
                .and_then(|v| v.get("utc"))
                .and_then(Value::as_str)
        })
        .or_else(|| record.get("datetime").and_then(Value::as_str))
        .or_else(|| record.get("date").and_then(Value::as_str))
        .map(str::to_string)
}
