//! In-process HTTP server standing in for the OpenAQ API in tests.

use crate::config::FetchConfig;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts requests reaching a handler.
#[derive(Clone, Default)]
pub(crate) struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    /// Records one request and returns the running total.
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{addr}")
}

/// Config pointing at a mock server, with fast retries.
pub(crate) fn test_config(base_url: &str) -> FetchConfig {
    FetchConfig::builder()
        .base_url(base_url)
        .request_timeout(Duration::from_secs(5))
        .retry_backoff(Duration::from_millis(1))
        .build()
}
