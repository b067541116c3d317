use crate::fetcher::api_client::ApiClient;
use crate::fetcher::error::FetchError;
use crate::fetcher::wire::{Page, WireCountry, WireLocation};
use crate::types::location::Location;
use crate::utils::{fold_accents, is_plausible_city_name, same_name};
use log::{debug, info};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashSet;

const COUNTRIES_PAGE_LIMIT: usize = 200;

/// Looks up the API's numeric id for an ISO country code.
pub(crate) async fn resolve_country_id(
    client: &ApiClient,
    country: &str,
) -> Result<i64, FetchError> {
    let page: Page<WireCountry> = client
        .get_json("/countries", &[("limit", COUNTRIES_PAGE_LIMIT.to_string())])
        .await?;
    page.results
        .into_iter()
        .find(|c| {
            c.code
                .as_deref()
                .is_some_and(|code| code.trim().eq_ignore_ascii_case(country.trim()))
        })
        .map(|c| c.id)
        .ok_or_else(|| {
            info!("Country {} is not listed by the API", country);
            FetchError::CountryNotFound {
                country: country.to_string(),
            }
        })
}

async fn location_page(
    client: &ApiClient,
    country_id: i64,
    page: u32,
) -> Result<Vec<WireLocation>, FetchError> {
    let query = [
        ("countries_id", country_id.to_string()),
        ("limit", client.config().page_size.to_string()),
        ("page", page.to_string()),
    ];
    let page: Page<WireLocation> = client.get_json("/locations", &query).await?;
    Ok(page.results)
}

/// Finds the monitoring location for `city` among the country's locations.
///
/// Pages through the country's locations in API order. The first location
/// whose locality or name equals `city` case-insensitively wins. If none does,
/// the first accent-insensitive match ("Sao Paulo" for "São Paulo") is used.
pub(crate) async fn resolve_location(
    client: &ApiClient,
    city: &str,
    country: &str,
) -> Result<Location, FetchError> {
    let country_id = resolve_country_id(client, country).await?;
    let folded_city = fold_accents(city);
    let page_size = client.config().page_size;
    let mut fallback: Option<WireLocation> = None;
    let mut scanned = 0usize;

    for page in 1..=client.config().max_location_pages {
        let locations = location_page(client, country_id, page).await?;
        let received = locations.len();
        scanned += received;

        for location in locations {
            if location.names().any(|name| same_name(name, city)) {
                info!(
                    "Resolved '{}' to location {} after scanning {} locations",
                    city, location.id, scanned
                );
                return Ok(location.into_location(country));
            }
            if fallback.is_none()
                && location.names().any(|name| fold_accents(name) == folded_city)
            {
                fallback = Some(location);
            }
        }

        if received < page_size {
            break;
        }
    }

    match fallback {
        Some(location) => {
            info!(
                "Resolved '{}' to location {} ignoring accents",
                city, location.id
            );
            Ok(location.into_location(country))
        }
        None => {
            info!(
                "No location named '{}' in {} ({} locations scanned)",
                city, country, scanned
            );
            Err(FetchError::LocationNotFound {
                city: city.to_string(),
                country: country.to_string(),
            })
        }
    }
}

/// Lists cities of `country` that currently report data.
///
/// Candidate names come from the locality (or site name) of every location,
/// minus implausible names and duplicates. At most `max_cities_checked`
/// candidates are probed for current data and at most `max_cities` are kept.
/// The result is sorted alphabetically, ignoring case.
pub(crate) async fn list_available_cities(
    client: &ApiClient,
    country: &str,
) -> Result<Vec<String>, FetchError> {
    let country_id = resolve_country_id(client, country).await?;
    let config = client.config();
    let mut seen = HashSet::new();
    let mut candidates: Vec<(String, i64)> = Vec::new();

    for page in 1..=config.max_location_pages {
        let locations = location_page(client, country_id, page).await?;
        let received = locations.len();
        for location in &locations {
            let Some(city) = location.city() else {
                continue;
            };
            if is_plausible_city_name(city) && seen.insert(city.to_lowercase()) {
                candidates.push((city.to_string(), location.id));
            }
        }
        if received < config.page_size {
            break;
        }
    }
    debug!(
        "{} candidate cities in {}, probing up to {}",
        candidates.len(),
        country,
        config.max_cities_checked
    );

    let mut cities = Vec::new();
    for (city, location_id) in candidates.into_iter().take(config.max_cities_checked) {
        if cities.len() >= config.max_cities {
            break;
        }
        match has_current_data(client, location_id).await {
            Ok(true) => cities.push(city),
            Ok(false) => debug!("Skipping {}: no current data", city),
            Err(e @ FetchError::Unauthorized { .. }) => return Err(e),
            Err(e) => debug!("Skipping {}: {}", city, e),
        }
    }

    cities.sort_by_key(|city| city.to_lowercase());
    info!("{} cities with current data in {}", cities.len(), country);
    Ok(cities)
}

async fn has_current_data(client: &ApiClient, location_id: i64) -> Result<bool, FetchError> {
    let path = format!("/locations/{location_id}/latest");
    match client
        .get_json::<Page<Value>>(&path, &[("limit", "1".to_string())])
        .await
    {
        Ok(page) => Ok(!page.results.is_empty()),
        Err(FetchError::HttpStatus {
            status: StatusCode::NOT_FOUND,
            ..
        }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use crate::fetcher::mock_server::{serve, test_config, HitCounter};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn countries() -> Json<Value> {
        Json(json!({
            "meta": {"found": 2},
            "results": [
                {"id": 9, "code": "PT", "name": "Portugal"},
                {"id": 45, "code": "BR", "name": "Brazil"}
            ]
        }))
    }

    fn location(id: i64, name: &str, locality: Option<&str>) -> Value {
        json!({
            "id": id,
            "name": name,
            "locality": locality,
            "country": {"id": 45, "code": "BR"},
            "sensors": [{"id": id * 10, "parameter": {"name": "pm25", "units": "µg/m³"}}]
        })
    }

    /// Serves `all` locations, paginated by the `limit`/`page` query parameters.
    fn paginated(all: Vec<Value>, hits: HitCounter) -> Router {
        Router::new()
            .route("/countries", get(|| async { countries() }))
            .route(
                "/locations",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    hits.hit();
                    let limit: usize = q["limit"].parse().unwrap();
                    let page: usize = q["page"].parse().unwrap();
                    let results: Vec<Value> =
                        all.iter().skip((page - 1) * limit).take(limit).cloned().collect();
                    async move { Json(json!({ "results": results })) }
                }),
            )
    }

    fn client(base_url: &str, page_size: usize) -> ApiClient {
        let config = crate::config::FetchConfig {
            page_size,
            ..test_config(base_url)
        };
        ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap()
    }

    #[tokio::test]
    async fn test_country_lookup() {
        let base_url = serve(paginated(vec![], HitCounter::default())).await;
        let client = client(&base_url, 100);
        assert_eq!(resolve_country_id(&client, "br").await.unwrap(), 45);
        assert!(matches!(
            resolve_country_id(&client, "XX").await,
            Err(FetchError::CountryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_first_exact_match_wins_across_pages() {
        let all = vec![
            location(1, "Sao Paulo Centro", Some("Sao Paulo")),
            location(2, "Campinas", None),
            location(3, "Pinheiros", Some("São Paulo")),
            location(4, "Ibirapuera", Some("SÃO PAULO")),
        ];
        let hits = HitCounter::default();
        let base_url = serve(paginated(all, hits.clone())).await;

        let location = resolve_location(&client(&base_url, 2), "são paulo", "BR")
            .await
            .unwrap();
        assert_eq!(location.id, 3);
        assert_eq!(location.sensors[0].id, 30);
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_accent_insensitive_fallback() {
        let all = vec![
            location(1, "Campinas", None),
            location(2, "Pinheiros", Some("São Paulo")),
        ];
        let base_url = serve(paginated(all, HitCounter::default())).await;

        let location = resolve_location(&client(&base_url, 100), "Sao Paulo", "BR")
            .await
            .unwrap();
        assert_eq!(location.id, 2);
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let all = vec![location(1, "Campinas", None), location(2, "Santos", None)];
        let hits = HitCounter::default();
        let base_url = serve(paginated(all, hits.clone())).await;

        let result = resolve_location(&client(&base_url, 1), "Atlantis", "BR").await;
        match result {
            Err(e @ FetchError::LocationNotFound { .. }) => assert!(e.is_no_data()),
            other => panic!("Expected LocationNotFound, got {:?}", other),
        }
        // Two full pages, then an empty one ends the scan.
        assert_eq!(hits.count(), 3);
    }

    #[tokio::test]
    async fn test_scan_is_bounded() {
        let all: Vec<Value> = (0..50).map(|i| location(i, &format!("Site {i}"), None)).collect();
        let hits = HitCounter::default();
        let base_url = serve(paginated(all, hits.clone())).await;
        let config = crate::config::FetchConfig {
            page_size: 5,
            max_location_pages: 3,
            ..test_config(&base_url)
        };
        let client = ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap();

        let result = resolve_location(&client, "Nowhere", "BR").await;
        assert!(matches!(result, Err(FetchError::LocationNotFound { .. })));
        assert_eq!(hits.count(), 3);
    }

    #[tokio::test]
    async fn test_list_available_cities() {
        let all = vec![
            location(1, "Station A", Some("Santos")),
            location(2, "Station B", Some("Campinas")),
            location(3, "Station C", Some("campinas")),
            location(4, "teste 01", None),
            location(5, "Station E", Some("Osasco")),
            location(6, "N/A", None),
        ];
        let router = paginated(all, HitCounter::default()).route(
            "/locations/{id}/latest",
            get(|Path(id): Path<i64>| async move {
                match id {
                    1 | 2 => Ok(Json(json!({"results": [{"value": 1.0}]}))),
                    5 => Ok(Json(json!({"results": []}))),
                    _ => Err(AxumStatus::NOT_FOUND),
                }
            }),
        );
        let base_url = serve(router).await;

        let cities = list_available_cities(&client(&base_url, 100), "BR")
            .await
            .unwrap();
        assert_eq!(cities, ["Campinas", "Santos"]);
    }

    #[tokio::test]
    async fn test_list_available_cities_respects_bounds() {
        let all: Vec<Value> = ["Santos", "Campinas", "Osasco", "Guarulhos", "Diadema"]
            .iter()
            .enumerate()
            .map(|(i, city)| location(i as i64, "Station", Some(city)))
            .collect();
        let probes = HitCounter::default();
        let counter = probes.clone();
        let router = paginated(all, HitCounter::default()).route(
            "/locations/{id}/latest",
            get(move || {
                counter.hit();
                async { Json(json!({"results": [{"value": 1.0}]})) }
            }),
        );
        let base_url = serve(router).await;
        let config = crate::config::FetchConfig {
            max_cities: 2,
            ..test_config(&base_url)
        };
        let client = ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap();

        let cities = list_available_cities(&client, "BR").await.unwrap();
        assert_eq!(cities, ["Campinas", "Santos"]);
        assert_eq!(probes.count(), 2);
    }
}
