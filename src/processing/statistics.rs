use crate::types::measurement_table::{MeasurementTable, COL_PARAMETER, COL_VALUE};
use crate::types::parameter::compare_parameters;
use polars::prelude::*;

const COL_COUNT: &str = "count";
const COL_MEAN: &str = "mean";
const COL_MIN: &str = "min";
const COL_MAX: &str = "max";
const COL_STD: &str = "std_dev";

/// Summary of all readings of one parameter in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStatistics {
    pub parameter: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` with fewer than two readings.
    pub std_dev: Option<f64>,
}

/// Count, mean, min, max and sample standard deviation per parameter, in
/// canonical parameter order.
pub fn parameter_statistics(table: &MeasurementTable) -> PolarsResult<Vec<ParameterStatistics>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let summary = table
        .to_frame()?
        .lazy()
        .group_by([col(COL_PARAMETER)])
        .agg([
            col(COL_VALUE).count().cast(DataType::UInt64).alias(COL_COUNT),
            col(COL_VALUE).mean().alias(COL_MEAN),
            col(COL_VALUE).min().alias(COL_MIN),
            col(COL_VALUE).max().alias(COL_MAX),
            col(COL_VALUE).std(1).alias(COL_STD),
        ])
        .collect()?;

    let parameters = summary.column(COL_PARAMETER)?.str()?;
    let counts = summary.column(COL_COUNT)?.u64()?;
    let means = summary.column(COL_MEAN)?.f64()?;
    let mins = summary.column(COL_MIN)?.f64()?;
    let maxs = summary.column(COL_MAX)?.f64()?;
    let stds = summary.column(COL_STD)?.f64()?;

    let mut stats = Vec::with_capacity(summary.height());
    for idx in 0..summary.height() {
        let (Some(parameter), Some(count), Some(mean), Some(min), Some(max)) = (
            parameters.get(idx),
            counts.get(idx),
            means.get(idx),
            mins.get(idx),
            maxs.get(idx),
        ) else {
            continue;
        };
        let count = count as usize;
        stats.push(ParameterStatistics {
            parameter: parameter.to_string(),
            count,
            mean,
            min,
            max,
            std_dev: stds.get(idx).filter(|s| count > 1 && s.is_finite()),
        });
    }
    stats.sort_by(|a, b| compare_parameters(&a.parameter, &b.parameter));
    Ok(stats)
}
