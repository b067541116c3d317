//! demos/city_report.rs
//!
//! Fetches the current air-quality readings of a city and prints the latest
//! value per parameter, a few statistics and the CSV export.
//!
//! To run this example (the API key is read from OPENAQ_API_KEY or a .env file):
//! RUST_LOG=info cargo run --example city_report -- "São Paulo" BR

use air_quality::{AirQuality, AirQualityError, AirQualityLevel, CityReport};

#[tokio::main]
async fn main() -> Result<(), AirQualityError> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let city = args.next().unwrap_or_else(|| "São Paulo".to_string());
    let country = args.next();

    let client = AirQuality::new()?;

    let cities = client
        .list_available_cities()
        .maybe_country(country.as_deref())
        .call()
        .await?;
    println!("Cities with current data: {}", cities.join(", "));

    let report = client
        .report()
        .city(&city)
        .maybe_country(country.as_deref())
        .call()
        .await?;

    let report = match report {
        CityReport::Ready(report) => report,
        CityReport::LocationNotFound { city, country } => {
            println!("No monitoring location found for {city} ({country}).");
            return Ok(());
        }
        CityReport::NoCurrentData { location } => {
            println!("{} has no current data.", location.display_name());
            return Ok(());
        }
    };

    println!(
        "\nLatest readings for {} (location {}):",
        report.location.display_name(),
        report.location.id
    );
    for (parameter, reading) in report.latest.iter_canonical() {
        let level = AirQualityLevel::classify(parameter, reading.value);
        println!(
            "  {:<24} {:>8.2} {:<8} {} [{}]",
            air_quality::format_parameter_label(parameter),
            reading.value,
            reading.unit,
            reading.timestamp,
            level
        );
    }

    println!("\nStatistics:");
    for stats in &report.statistics {
        println!(
            "  {:<12} n={:<4} mean={:.2} min={:.2} max={:.2}",
            stats.parameter, stats.count, stats.mean, stats.min, stats.max
        );
    }

    println!("\n{}:", report.csv_file_name());
    print!("{}", report.table.to_csv_string()?);

    Ok(())
}
