/// Human-readable label, with unit, for a parameter code.
///
/// Matching ignores case. Unknown codes are returned uppercased, so this never
/// fails.
///
/// ```
/// use air_quality::format_parameter_label;
///
/// assert_eq!(format_parameter_label("pm25"), "PM2.5 (µg/m³)");
/// assert_eq!(format_parameter_label("NO2"), "NO₂ (µg/m³)");
/// assert_eq!(format_parameter_label("pollen"), "POLLEN");
/// ```
pub fn format_parameter_label(parameter: &str) -> String {
    let label = match parameter.trim().to_lowercase().as_str() {
        "pm25" => "PM2.5 (µg/m³)",
        "pm10" => "PM10 (µg/m³)",
        "pm1" => "PM1 (µg/m³)",
        "o3" => "O₃ (µg/m³)",
        "no2" => "NO₂ (µg/m³)",
        "so2" => "SO₂ (µg/m³)",
        "co" => "CO (µg/m³)",
        "no" => "NO (µg/m³)",
        "nox" => "NOₓ (µg/m³)",
        "bc" => "Black carbon (µg/m³)",
        "temperature" => "Temperature (°C)",
        "relativehumidity" => "Relative humidity (%)",
        _ => return parameter.to_uppercase(),
    };
    label.to_string()
}
