use crate::config::{ApiKey, FetchConfig};
use crate::error::ConfigError;
use crate::fetcher::error::{FetchError, TransientFailure};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated JSON GETs against the API, with the bounded retry policy
/// from [`FetchConfig`].
pub(crate) struct ApiClient {
    http: Client,
    api_key: ApiKey,
    config: FetchConfig,
}

impl ApiClient {
    pub fn new(api_key: ApiKey, config: FetchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ConfigError::ClientBuild)?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GETs `path` (relative to the base URL) and decodes the JSON body.
    ///
    /// Timeouts, connection failures, 5xx and 429 are retried up to
    /// `max_attempts` times in total with exponential backoff. 401/403 fail
    /// immediately, as do other non-success statuses.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("GET {} (attempt {})", url, attempt);

            let outcome = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, self.api_key.expose())
                .query(query)
                .send()
                .await;

            let failure = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(FetchError::Unauthorized { url, status });
                    }
                    if status.is_success() {
                        // A body that stalls or breaks off is a transport failure, not bad JSON.
                        match response.bytes().await {
                            Ok(body) => {
                                return serde_json::from_slice::<T>(&body)
                                    .map_err(|source| FetchError::Decode { url, source });
                            }
                            Err(e) if e.is_timeout() => TransientFailure::Timeout(e),
                            Err(e) => TransientFailure::Connection(e),
                        }
                    } else if is_retryable_status(status) {
                        TransientFailure::Status(status)
                    } else {
                        return Err(FetchError::HttpStatus { url, status });
                    }
                }
                Err(e) if e.is_timeout() => TransientFailure::Timeout(e),
                Err(e) if e.is_connect() => TransientFailure::Connection(e),
                Err(e) => return Err(FetchError::NetworkRequest(url, e)),
            };

            if attempt >= self.config.max_attempts {
                warn!("Giving up on {} after {} attempts: {}", url, attempt, failure);
                return Err(FetchError::RetriesExhausted {
                    url,
                    attempts: attempt,
                    source: failure,
                });
            }

            let delay = self.config.backoff_for(attempt);
            warn!(
                "Request to {} failed ({}), retrying in {:?}",
                url, failure, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock_server::{serve, test_config, HitCounter};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiKey::new("test-key").unwrap(), test_config(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/countries",
            get(move || {
                counter.hit();
                async { AxumStatus::UNAUTHORIZED }
            }),
        );
        let base_url = serve(router).await;

        let result = client(&base_url).get_json::<Value>("/countries", &[]).await;

        match result {
            Err(e @ FetchError::Unauthorized { .. }) => {
                assert_eq!(e.retries(), 0);
                assert!(!e.to_string().contains("test-key"));
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
        assert_eq!(hits.count(), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_surface() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/countries",
            get(move || {
                counter.hit();
                async { AxumStatus::SERVICE_UNAVAILABLE }
            }),
        );
        let base_url = serve(router).await;

        let result = client(&base_url).get_json::<Value>("/countries", &[]).await;

        match result {
            Err(e @ FetchError::RetriesExhausted { .. }) => {
                assert_eq!(e.retries(), 2);
                assert!(matches!(
                    e,
                    FetchError::RetriesExhausted {
                        attempts: 3,
                        source: TransientFailure::Status(StatusCode::SERVICE_UNAVAILABLE),
                        ..
                    }
                ));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
        assert_eq!(hits.count(), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/countries",
            get(move || {
                let n = counter.hit();
                async move {
                    if n == 1 {
                        Err(AxumStatus::BAD_GATEWAY)
                    } else {
                        Ok(Json(json!({"results": []})))
                    }
                }
            }),
        );
        let base_url = serve(router).await;

        let body: Value = client(&base_url)
            .get_json("/countries", &[])
            .await
            .unwrap();
        assert_eq!(body, json!({"results": []}));
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/countries",
            get(move || {
                let n = counter.hit();
                async move {
                    if n == 1 {
                        Err(AxumStatus::TOO_MANY_REQUESTS)
                    } else {
                        Ok(Json(json!({"results": [{"id": 45}]})))
                    }
                }
            }),
        );
        let base_url = serve(router).await;

        let body: Value = client(&base_url)
            .get_json("/countries", &[])
            .await
            .unwrap();
        assert_eq!(body["results"][0]["id"], 45);
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_stalled_body_is_retried() {
        use tokio::io::AsyncWriteExt;

        // Sends a complete header announcing 100 bytes, then only 5 of them.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = HitCounter::default();
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.hit();
                tokio::spawn(async move {
                    let mut request = [0u8; 1024];
                    let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut request).await;
                    let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n";
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(b"{\"res").await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_secs(5)).await;
                });
            }
        });
        let config = FetchConfig {
            request_timeout: Duration::from_millis(200),
            max_attempts: 2,
            ..test_config(&format!("http://{addr}"))
        };
        let client = ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap();

        let result = client.get_json::<Value>("/countries", &[]).await;
        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted {
                attempts: 2,
                source: TransientFailure::Timeout(_) | TransientFailure::Connection(_),
                ..
            })
        ));
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/countries",
            get(move || {
                counter.hit();
                async { "{not json" }
            }),
        );
        let base_url = serve(router).await;

        let result = client(&base_url).get_json::<Value>("/countries", &[]).await;
        assert!(matches!(result, Err(FetchError::Decode { .. })));
        assert_eq!(hits.count(), 1);
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/slow",
            get(move || {
                counter.hit();
                async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Json(json!({}))
                }
            }),
        );
        let base_url = serve(router).await;
        let config = FetchConfig {
            request_timeout: Duration::from_millis(50),
            max_attempts: 2,
            ..test_config(&base_url)
        };
        let client = ApiClient::new(ApiKey::new("k").unwrap(), config).unwrap();

        let result = client.get_json::<Value>("/slow", &[]).await;
        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted {
                attempts: 2,
                source: TransientFailure::Timeout(_),
                ..
            })
        ));
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let hits = HitCounter::default();
        let counter = hits.clone();
        let router = Router::new().route(
            "/missing",
            get(move || {
                counter.hit();
                async { AxumStatus::NOT_FOUND }
            }),
        );
        let base_url = serve(router).await;

        let result = client(&base_url).get_json::<Value>("/missing", &[]).await;
        assert!(matches!(
            result,
            Err(FetchError::HttpStatus { status: StatusCode::NOT_FOUND, .. })
        ));
        assert_eq!(hits.count(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind and drop a listener so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{addr}"))
            .get_json::<Value>("/countries", &[])
            .await;
        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted {
                source: TransientFailure::Connection(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_sends_api_key_header() {
        let router = Router::new().route(
            "/echo",
            get(|headers: axum::http::HeaderMap| async move {
                let key = headers
                    .get(API_KEY_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "key": key }))
            }),
        );
        let base_url = serve(router).await;

        let body: Value = client(&base_url).get_json("/echo", &[]).await.unwrap();
        assert_eq!(body["key"], "test-key");
    }
}
