//! The time-indexed, one-column-per-parameter view used for trend charts.

use crate::types::measurement_table::COL_TIMESTAMP;
use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;

/// A read-only grid of values: one row per distinct timestamp (ascending),
/// one column per parameter. Cells with no reading are `None`, never zero.
///
/// Built by [`crate::pivot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotedSeries {
    timestamps: Vec<DateTime<Utc>>,
    parameters: Vec<String>,
    /// `columns[p][t]` is the value of `parameters[p]` at `timestamps[t]`.
    columns: Vec<Vec<Option<f64>>>,
}

impl PivotedSeries {
    pub(crate) fn new(
        timestamps: Vec<DateTime<Utc>>,
        parameters: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(parameters.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == timestamps.len()));
        Self {
            timestamps,
            parameters,
            columns,
        }
    }

    /// Row index, ascending.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Column names, in canonical parameter order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of rows (distinct timestamps).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// All cells of one parameter, aligned with [`PivotedSeries::timestamps`].
    pub fn column(&self, parameter: &str) -> Option<&[Option<f64>]> {
        self.parameters
            .iter()
            .position(|p| p == parameter)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterates `(parameter, cells)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.parameters
            .iter()
            .zip(self.columns.iter())
            .map(|(p, c)| (p.as_str(), c.as_slice()))
    }

    /// The cell at (`timestamp`, `parameter`); `None` when absent or unknown.
    pub fn value_at(&self, timestamp: DateTime<Utc>, parameter: &str) -> Option<f64> {
        let row = self.timestamps.binary_search(&timestamp).ok()?;
        self.column(parameter).and_then(|cells| cells[row])
    }

    /// Converts the grid into a Polars `DataFrame`: a `timestamp` column followed
    /// by one nullable `f64` column per parameter.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let timestamps: Vec<NaiveDateTime> =
            self.timestamps.iter().map(|ts| ts.naive_utc()).collect();
        let mut columns = Vec::with_capacity(self.parameters.len() + 1);
        columns.push(Column::from(Series::new(COL_TIMESTAMP.into(), timestamps)));
        for (parameter, cells) in self.columns() {
            columns.push(Column::from(Series::new(parameter.into(), cells.to_vec())));
        }
        DataFrame::new(columns)
    }
}
