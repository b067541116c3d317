//! demos/plot_city.rs
//!
//! Shows the trend and current-readings charts of a city in the browser.
//!
//! To run this example:
//! cargo run --example plot_city --features plotting -- "Rio de Janeiro"

use air_quality::{plot, AirQuality, CityReport};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let city = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "São Paulo".to_string());

    let client = AirQuality::new()?;
    println!("Fetching air-quality data for {city}...");

    match client.report().city(&city).limit(500).call().await? {
        CityReport::Ready(report) => {
            if !plot::show(&report.time_series_chart)? {
                println!("Not enough data for a trend chart.");
            }
            plot::show(&report.bar_chart)?;
            println!("Charts shown in browser.");
        }
        other => println!("Nothing to plot: {other:?}"),
    }

    Ok(())
}
