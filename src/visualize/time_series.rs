use crate::types::pivoted_series::PivotedSeries;
use crate::visualize::chart::{Chart, ChartBody, LineSeries};
use crate::visualize::labels::format_parameter_label;

const X_LABEL: &str = "Time (UTC)";
const Y_LABEL: &str = "Value";

/// Builds the trend chart: one line per parameter column of `series`.
///
/// Columns without a single reading are left out. An empty series, or one
/// where every column is empty, gives a "no data" chart.
pub fn build_time_series_chart(series: &PivotedSeries, title: &str) -> Chart {
    let lines: Vec<LineSeries> = series
        .columns()
        .filter_map(|(parameter, cells)| {
            let points: Vec<_> = series
                .timestamps()
                .iter()
                .zip(cells)
                .filter_map(|(ts, cell)| cell.map(|value| (*ts, value)))
                .collect();
            (!points.is_empty()).then(|| LineSeries {
                parameter: parameter.to_string(),
                label: format_parameter_label(parameter),
                points,
            })
        })
        .collect();

    if lines.is_empty() {
        return Chart::no_data(title, X_LABEL, Y_LABEL);
    }
    Chart {
        title: title.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        body: ChartBody::TimeSeries(lines),
    }
}
