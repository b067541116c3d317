//! Rendering of [`Chart`]s with `plotlars`.

use crate::types::measurement_table::COL_TIMESTAMP;
use crate::visualize::chart::{Chart, ChartBody, LineSeries};
use plotlars::{BarPlot, Plot, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

const COL_LABEL: &str = "parameter";
const COL_VALUE: &str = "value";
const X_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

enum Output<'a> {
    Browser,
    Html(&'a Path),
}

/// Opens the chart in the default browser. Returns `false` for a "no data"
/// chart, which has nothing to draw.
pub fn show(chart: &Chart) -> PolarsResult<bool> {
    render(chart, Output::Browser)
}

/// Writes the chart as a standalone HTML file. Returns `false`, and writes
/// nothing, for a "no data" chart.
pub fn write_html(chart: &Chart, path: &Path) -> PolarsResult<bool> {
    render(chart, Output::Html(path))
}

fn render(chart: &Chart, output: Output<'_>) -> PolarsResult<bool> {
    match &chart.body {
        ChartBody::NoData { .. } => Ok(false),
        ChartBody::TimeSeries(lines) => {
            let frame = time_series_frame(lines)?;
            let names: Vec<&str> = frame
                .get_column_names()
                .into_iter()
                .skip(1)
                .map(|name| name.as_str())
                .collect();
            let Some((first, rest)) = names.split_first() else {
                return Ok(false);
            };
            let plot = TimeSeriesPlot::builder()
                .data(&frame)
                .x(COL_TIMESTAMP)
                .y(*first)
                .maybe_additional_series((!rest.is_empty()).then(|| rest.to_vec()))
                .plot_title(Text::from(chart.title.as_str()).size(18))
                .x_title(chart.x_label.as_str())
                .y_title(chart.y_label.as_str())
                .build();
            emit(&plot, output);
            Ok(true)
        }
        ChartBody::Bars(bars) => {
            let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
            let values: Vec<f64> = bars.iter().map(|b| b.value).collect();
            let frame = DataFrame::new(vec![
                Column::from(Series::new(COL_LABEL.into(), labels)),
                Column::from(Series::new(COL_VALUE.into(), values)),
            ])?;
            let plot = BarPlot::builder()
                .data(&frame)
                .labels(COL_LABEL)
                .values(COL_VALUE)
                .plot_title(Text::from(chart.title.as_str()).size(18))
                .x_title(chart.x_label.as_str())
                .y_title(chart.y_label.as_str())
                .build();
            emit(&plot, output);
            Ok(true)
        }
    }
}

fn emit(plot: &impl Plot, output: Output<'_>) {
    match output {
        Output::Browser => plot.plot(),
        Output::Html(path) => plot.write_html(path.to_string_lossy()),
    }
}

/// Aligns all lines on the union of their timestamps, one column per line,
/// named after the line's label (see [`series_names`]).
fn time_series_frame(lines: &[LineSeries]) -> PolarsResult<DataFrame> {
    let timestamps: BTreeSet<_> = lines
        .iter()
        .flat_map(|line| line.points.iter().map(|(ts, _)| *ts))
        .collect();
    let x: Vec<String> = timestamps
        .iter()
        .map(|ts| ts.format(X_TIMESTAMP_FORMAT).to_string())
        .collect();

    let mut columns = vec![Column::from(Series::new(COL_TIMESTAMP.into(), x))];
    for (line, name) in lines.iter().zip(series_names(lines)) {
        let cells: Vec<Option<f64>> = timestamps
            .iter()
            .map(|ts| {
                line.points
                    .iter()
                    .find(|(point_ts, _)| point_ts == ts)
                    .map(|(_, value)| *value)
            })
            .collect();
        columns.push(Column::from(Series::new(name.into(), cells)));
    }
    DataFrame::new(columns)
}

/// Legend names for `lines`: the label, unless an earlier line already uses
/// it ("pm25" and "PM25" both read "PM2.5 (µg/m³)"), in which case the raw
/// parameter code is appended. Names are unique and never collide with the
/// timestamp column.
fn series_names(lines: &[LineSeries]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::from([COL_TIMESTAMP.to_string()]);
    lines
        .iter()
        .map(|line| {
            let mut name = line.label.clone();
            if taken.contains(&name) {
                name = format!("{} [{}]", line.label, line.parameter);
            }
            let base = name.clone();
            let mut n = 2;
            while taken.contains(&name) {
                name = format!("{base} #{n}");
                n += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}
