use crate::types::measurement_table::MeasurementTable;
use crate::types::parameter::compare_parameters;
use crate::types::pivoted_series::PivotedSeries;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Reshapes the table into one row per distinct timestamp (ascending) and one
/// column per parameter (canonical parameter order).
///
/// Cells without a matching row stay `None`. When two rows share the same
/// (timestamp, parameter) pair the later one in table order wins.
pub fn pivot(table: &MeasurementTable) -> PivotedSeries {
    let timestamps: BTreeSet<DateTime<Utc>> = table.iter().map(|row| row.timestamp).collect();
    let mut parameters: Vec<String> = table
        .iter()
        .map(|row| row.parameter.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    parameters.sort_by(|a, b| compare_parameters(a, b));

    let row_index: BTreeMap<DateTime<Utc>, usize> = timestamps
        .iter()
        .enumerate()
        .map(|(idx, ts)| (*ts, idx))
        .collect();
    let column_index: BTreeMap<&str, usize> = parameters
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.as_str(), idx))
        .collect();

    let mut columns = vec![vec![None; timestamps.len()]; parameters.len()];
    for row in table {
        let t = row_index[&row.timestamp];
        let p = column_index[row.parameter.as_str()];
        columns[p][t] = Some(row.value);
    }

    PivotedSeries::new(timestamps.into_iter().collect(), parameters, columns)
}
