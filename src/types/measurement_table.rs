//! Contains the normalized [`MeasurementTable`] and its export helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;
use std::io::Write;

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_PARAMETER: &str = "parameter";
pub const COL_VALUE: &str = "value";
pub const COL_UNIT: &str = "unit";

/// Format of timestamps in the CSV export.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One validated reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub parameter: String,
    pub value: f64,
    pub unit: String,
}

/// Ordered rows of validated readings from a single location.
///
/// Produced by [`crate::process`]. Rows keep the order the API sent them in;
/// use [`MeasurementTable::sorted_by_time`] for a chronological copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    location_id: Option<i64>,
    rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn new(location_id: Option<i64>, rows: Vec<Measurement>) -> Self {
        Self { location_id, rows }
    }

    /// The location every row belongs to, `None` for an empty table.
    pub fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Measurement> {
        self.rows
    }

    /// Returns a copy with rows in ascending timestamp order (stable for equal timestamps).
    pub fn sorted_by_time(&self) -> MeasurementTable {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.timestamp);
        MeasurementTable::new(self.location_id, rows)
    }

    /// Converts the table into a Polars `DataFrame` with columns
    /// `timestamp` (naive UTC datetime), `parameter`, `value` and `unit`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let timestamps: Vec<NaiveDateTime> =
            self.rows.iter().map(|row| row.timestamp.naive_utc()).collect();
        self.frame_with_timestamps(Series::new(COL_TIMESTAMP.into(), timestamps))
    }

    /// Writes the table as CSV: header `timestamp,parameter,value,unit`,
    /// one line per row, timestamps formatted with [`CSV_TIMESTAMP_FORMAT`].
    pub fn write_csv<W: Write>(&self, writer: W) -> PolarsResult<()> {
        let timestamps: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string())
            .collect();
        let mut frame =
            self.frame_with_timestamps(Series::new(COL_TIMESTAMP.into(), timestamps))?;
        CsvWriter::new(writer)
            .include_header(true)
            .finish(&mut frame)
    }

    pub fn to_csv_string(&self) -> PolarsResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| PolarsError::ComputeError(format!("CSV output is not UTF-8: {e}").into()))
    }

    fn frame_with_timestamps(&self, timestamps: Series) -> PolarsResult<DataFrame> {
        let parameters: Vec<&str> = self.rows.iter().map(|row| row.parameter.as_str()).collect();
        let values: Vec<f64> = self.rows.iter().map(|row| row.value).collect();
        let units: Vec<&str> = self.rows.iter().map(|row| row.unit.as_str()).collect();
        DataFrame::new(vec![
            Column::from(timestamps),
            Column::from(Series::new(COL_PARAMETER.into(), parameters)),
            Column::from(Series::new(COL_VALUE.into(), values)),
            Column::from(Series::new(COL_UNIT.into(), units)),
        ])
    }
}

impl<'a> IntoIterator for &'a MeasurementTable {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Suggested file name for a city's CSV export, e.g. `air_quality_sao_paulo.csv`
/// for "Sao Paulo".
pub fn csv_file_name(city: &str) -> String {
    let slug: String = city
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("air_quality_{slug}.csv")
}
