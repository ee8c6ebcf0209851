//! Fetch-or-default: every endpoint yields a payload, usable or empty.

use super::endpoint::Endpoint;
use super::http_client::{FetchFailure, HttpClient};
use futures::future::join_all;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// The outcome of polling one endpoint.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Endpoint path as configured.
    pub path: String,
    /// Decoded body, or the shape's empty payload when `succeeded` is false.
    pub payload: Value,
    pub succeeded: bool,
    pub failure: Option<FetchFailure>,
    pub elapsed_ms: u64,
}

/// GET one endpoint, substituting the shape's empty payload on any failure.
pub async fn fetch_or_default(client: &HttpClient, api_base: &str, endpoint: &Endpoint) -> Fetched {
    let url = endpoint.url(api_base);
    let start = Instant::now();
    let result = client.get_json(&url).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(payload) => {
            debug!(%url, elapsed_ms, "endpoint fetched");
            Fetched {
                path: endpoint.path.clone(),
                payload,
                succeeded: true,
                failure: None,
                elapsed_ms,
            }
        }
        Err(failure) => {
            info!(%url, elapsed_ms, %failure, "endpoint unusable, using empty payload");
            Fetched {
                path: endpoint.path.clone(),
                payload: endpoint.shape.empty_payload(),
                succeeded: false,
                failure: Some(failure),
                elapsed_ms,
            }
        }
    }
}

/// Poll every endpoint concurrently. Results come back in input order, and
/// one endpoint's failure never cancels the others.
pub async fn fetch_all(
    client: &HttpClient,
    api_base: &str,
    endpoints: &[&Endpoint],
) -> Vec<Fetched> {
    join_all(
        endpoints
            .iter()
            .map(|endpoint| fetch_or_default(client, api_base, endpoint)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::endpoint::PayloadShape;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_or_default_substitutes_empty_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(2)).unwrap();
        let endpoint = Endpoint::new("/products/all", PayloadShape::country_map("data"));
        let fetched = fetch_or_default(&client, &server.uri(), &endpoint).await;

        assert!(!fetched.succeeded);
        assert_eq!(fetched.payload, json!({"data": {}}));
        assert_eq!(fetched.failure, Some(FetchFailure::Status(500)));
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order_and_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"_id": "c1"}]}))
                    .set_delay(Duration::from_millis(100)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blogs"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(2)).unwrap();
        let collections = Endpoint::new("/collection", PayloadShape::wrapped_list(&["data"]));
        let blogs = Endpoint::new("/blogs", PayloadShape::wrapped_list(&["blogs", "data"]));

        let fetched = fetch_all(&client, &server.uri(), &[&collections, &blogs]).await;
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].path, "/collection");
        assert!(fetched[0].succeeded);
        assert_eq!(fetched[0].payload, json!({"data": [{"_id": "c1"}]}));
        assert_eq!(fetched[1].path, "/blogs");
        assert!(!fetched[1].succeeded);
        assert_eq!(fetched[1].payload, json!({"blogs": []}));
    }

    #[tokio::test]
    async fn test_fetch_or_default_unreachable_host() {
        let client = HttpClient::new(Duration::from_millis(500)).unwrap();
        let endpoint = Endpoint::new("/blogs", PayloadShape::wrapped_list(&["blogs"]));
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let fetched = fetch_or_default(&client, "http://127.0.0.1:9", &endpoint).await;
        assert!(!fetched.succeeded);
        assert_eq!(fetched.payload, json!({"blogs": []}));
    }
}
