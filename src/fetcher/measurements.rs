use crate::fetcher::api_client::ApiClient;
use crate::fetcher::error::FetchError;
use crate::fetcher::wire::Page;
use crate::types::location::Location;
use crate::types::raw_measurement::RawMeasurement;
use log::{debug, info};
use reqwest::StatusCode;
use serde_json::Value;

/// Fetches up to `limit` current records of `location`, in the order the API
/// sends them.
///
/// Pages of `page_size` records are requested until `limit` records are
/// collected or a short page marks the end of the data. A location the API
/// does not know (404) counts as a location without data.
pub(crate) async fn fetch_measurements(
    client: &ApiClient,
    location: &Location,
    limit: usize,
) -> Result<Vec<RawMeasurement>, FetchError> {
    let page_size = client.config().page_size;
    let path = format!("/locations/{}/latest", location.id);
    let mut records: Vec<RawMeasurement> = Vec::with_capacity(limit.min(page_size));
    let mut page = 1u32;

    while records.len() < limit {
        let query = [
            ("limit", page_size.to_string()),
            ("page", page.to_string()),
        ];
        let results = match client.get_json::<Page<Value>>(&path, &query).await {
            Ok(body) => body.results,
            Err(FetchError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                ..
            }) => {
                debug!("Location {} has no latest endpoint data (404)", location.id);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let received = results.len();
        let remaining = limit - records.len();
        records.extend(
            results
                .iter()
                .take(remaining)
                .map(|record| RawMeasurement::from_json(record, location)),
        );
        debug!(
            "Page {} of location {}: {} records ({} kept so far)",
            page,
            location.id,
            received,
            records.len()
        );

        if received < page_size {
            break;
        }
        page += 1;
    }

    if records.is_empty() {
        info!("No current measurements for location {}", location.id);
        return Err(FetchError::EmptyResult {
            location_id: location.id,
        });
    }
    info!(
        "Fetched {} records for location {} ({})",
        records.len(),
        location.id,
        location.display_name()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, FetchConfig};
    use crate::fetcher::mock_server::{serve, test_config, HitCounter};
    use crate::types::location::Sensor;
    use crate::types::raw_measurement::RawValue;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn location() -> Location {
        Location {
            id: 7,
            name: "Pinheiros".to_string(),
            locality: Some("São Paulo".to_string()),
            country_code: "BR".to_string(),
            sensors: vec![Sensor {
                id: 70,
                parameter: "pm25".to_string(),
                unit: "µg/m³".to_string(),
            }],
        }
    }

    fn record(n: usize) -> Value {
        json!({
            "datetime": {"utc": format!("2024-01-01T{:02}:00:00Z", n % 24), "local": null},
            "value": n as f64,
            "sensorsId": 70,
            "locationsId": 7
        })
    }

    /// Serves `total` records on `/locations/7/latest`, paginated.
    fn latest_router(total: usize, hits: HitCounter) -> Router {
        Router::new().route(
            "/locations/7/latest",
            get(move |Query(q): Query<HashMap<String, String>>| {
                hits.hit();
                let limit: usize = q["limit"].parse().unwrap();
                let page: usize = q["page"].parse().unwrap();
                let results: Vec<Value> = (0..total)
                    .skip((page - 1) * limit)
                    .take(limit)
                    .map(record)
                    .collect();
                async move { Json(json!({ "meta": {"found": total}, "results": results })) }
            }),
        )
    }

    fn client(base_url: &str, page_size: usize) -> ApiClient {
        let config = FetchConfig {
            page_size,
            ..test_config(base_url)
        };
        ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap()
    }

    #[tokio::test]
    async fn test_stops_at_limit() {
        let hits = HitCounter::default();
        let base_url = serve(latest_router(250, hits.clone())).await;

        let records = fetch_measurements(&client(&base_url, 50), &location(), 120)
            .await
            .unwrap();

        assert_eq!(records.len(), 120);
        assert_eq!(records[0].value, RawValue::Number(0.0));
        assert_eq!(records[119].value, RawValue::Number(119.0));
        assert_eq!(hits.count(), 3);
    }

    #[tokio::test]
    async fn test_returns_everything_below_limit() {
        let hits = HitCounter::default();
        let base_url = serve(latest_router(30, hits.clone())).await;

        let records = fetch_measurements(&client(&base_url, 50), &location(), 100)
            .await
            .unwrap();

        assert_eq!(records.len(), 30);
        assert_eq!(hits.count(), 1);
        assert_eq!(records[0].parameter.as_deref(), Some("pm25"));
        assert_eq!(records[0].unit.as_deref(), Some("µg/m³"));
    }

    #[tokio::test]
    async fn test_exact_multiple_of_page_size() {
        let hits = HitCounter::default();
        let base_url = serve(latest_router(100, hits.clone())).await;

        let records = fetch_measurements(&client(&base_url, 50), &location(), 500)
            .await
            .unwrap();

        assert_eq!(records.len(), 100);
        // The third, empty page confirms the end of the data.
        assert_eq!(hits.count(), 3);
    }

    #[tokio::test]
    async fn test_zero_records_is_empty_result() {
        let base_url = serve(latest_router(0, HitCounter::default())).await;

        let result = fetch_measurements(&client(&base_url, 50), &location(), 100).await;
        match result {
            Err(e @ FetchError::EmptyResult { location_id: 7 }) => assert!(e.is_no_data()),
            other => panic!("Expected EmptyResult, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_location_is_empty_result() {
        let router = Router::new().route(
            "/locations/7/latest",
            get(|| async { AxumStatus::NOT_FOUND }),
        );
        let base_url = serve(router).await;

        let result = fetch_measurements(&client(&base_url, 50), &location(), 100).await;
        assert!(matches!(result, Err(FetchError::EmptyResult { .. })));
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces() {
        let router = Router::new().route(
            "/locations/7/latest",
            get(|| async { AxumStatus::FORBIDDEN }),
        );
        let base_url = serve(router).await;

        let result = fetch_measurements(&client(&base_url, 50), &location(), 100).await;
        assert!(matches!(result, Err(FetchError::Unauthorized { .. })));
    }
}
