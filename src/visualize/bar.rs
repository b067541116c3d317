use crate::types::latest::LatestMeasurements;
use crate::types::parameter::AirQualityLevel;
use crate::visualize::chart::{Bar, Chart, ChartBody};
use crate::visualize::labels::format_parameter_label;

const X_LABEL: &str = "Parameter";
const Y_LABEL: &str = "Latest value";

/// Builds the current-readings chart: one bar per parameter, in canonical
/// parameter order so repeated renders look the same.
pub fn build_bar_chart(latest: &LatestMeasurements, title: &str) -> Chart {
    if latest.is_empty() {
        return Chart::no_data(title, X_LABEL, Y_LABEL);
    }
    let bars = latest
        .iter_canonical()
        .map(|(parameter, reading)| Bar {
            parameter: parameter.to_string(),
            label: format_parameter_label(parameter),
            value: reading.value,
            unit: reading.unit.clone(),
            timestamp: reading.timestamp,
            annotation: format!("{:.2} {}", reading.value, reading.unit),
            level: AirQualityLevel::classify(parameter, reading.value),
        })
        .collect();
    Chart {
        title: title.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        body: ChartBody::Bars(bars),
    }
}
