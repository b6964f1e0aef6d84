//! Integration tests for the demo services.
//!
//! Routers are driven in-process with `tower::ServiceExt::oneshot`; the probe
//! test binds a loopback listener. No external network is used.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use demo_services::backend::{self, BackendState, ENDPOINTS};
use demo_services::config::{BackendConfig, NOT_CONFIGURED};
use demo_services::frontend::{self, FrontendState};
use demo_services::probe::{build_client, probe_backend, PROBE_PATHS};

struct TestResponse {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

async fn call(app: &Router, method: Method, uri: &str) -> TestResponse {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    call(app, Method::GET, uri).await
}

fn backend_with(config: BackendConfig) -> (BackendState, Router) {
    let state = BackendState::new(config);
    let app = backend::create_router(state.clone());
    (state, app)
}

fn default_backend() -> (BackendState, Router) {
    backend_with(BackendConfig::default())
}

// === Backend routes ===

#[tokio::test]
async fn health_reports_counters_and_environment() {
    let (_, app) = backend_with(BackendConfig {
        environment: "staging".to_string(),
        ..BackendConfig::default()
    });

    get(&app, "/does-not-exist").await;
    let response = get(&app, "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "application/json"
    );

    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "backend");
    assert_eq!(body["environment"], "staging");
    assert_eq!(body["requestCount"], 2);
    assert_eq!(body["errorCount"], 1);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn metadata_reports_sql_not_configured_by_default() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/metadata").await.json();

    assert_eq!(body["service"], "backend");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["environment"], "production");
    assert_eq!(body["appInsightsKey"], NOT_CONFIGURED);
    assert_eq!(body["sqlConfigured"], false);
}

#[tokio::test]
async fn metadata_treats_sentinel_as_not_configured() {
    let (_, app) = backend_with(BackendConfig {
        connection_string: Some(NOT_CONFIGURED.to_string()),
        ..BackendConfig::default()
    });

    let body = get(&app, "/api/metadata").await.json();
    assert_eq!(body["sqlConfigured"], false);
}

#[tokio::test]
async fn metadata_reports_sql_configured_and_client_id() {
    let (_, app) = backend_with(BackendConfig {
        client_id: "00000000-1111-2222-3333-444444444444".to_string(),
        connection_string: Some("Server=tcp:demo.database.windows.net,1433;".to_string()),
        ..BackendConfig::default()
    });

    let body = get(&app, "/api/metadata").await.json();
    assert_eq!(body["appInsightsKey"], "00000000-1111-2222-3333-444444444444");
    assert_eq!(body["sqlConfigured"], true);
}

#[tokio::test]
async fn status_includes_runtime_metrics() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/status").await.json();

    assert_eq!(body["status"], "operational");
    assert_eq!(body["service"], "backend-api");
    assert_eq!(body["requestCount"], 1);
    assert_eq!(body["errorCount"], 0);
    assert_eq!(body["metrics"]["environment"], "production");
    assert!(body["metrics"]["node_version"].is_string());
}

#[tokio::test]
async fn echo_returns_query_unchanged() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/echo?x=1&y=2").await.json();

    assert_eq!(body["message"], "Echo response from backend");
    assert_eq!(body["query"], json!({"x": "1", "y": "2"}));
}

#[tokio::test]
async fn echo_without_query_returns_empty_object() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/echo").await.json();
    assert_eq!(body["query"], json!({}));
}

#[tokio::test]
async fn echo_decodes_percent_encoding() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/echo?msg=hello%20world&empty=").await.json();
    assert_eq!(body["query"], json!({"msg": "hello world", "empty": ""}));
}

#[tokio::test]
async fn data_returns_requested_count_and_tracks_errors() {
    let (state, app) = default_backend();

    let response = get(&app, "/api/data?count=5").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(body["count"], 5);

    let flagged = items.iter().filter(|i| i["status"] == "error").count() as u64;
    assert_eq!(body["errors"].as_u64().unwrap(), flagged);
    assert_eq!(state.error_count(), flagged);

    for (index, item) in items.iter().enumerate() {
        assert_eq!(item["id"], index as u64 + 1);
        assert_eq!(item["name"], format!("Item {}", index + 1));
        assert!(item["status"] == "ok" || item["status"] == "error");
        assert!(item["timestamp"].is_string());
    }
}

#[tokio::test]
async fn data_error_counter_accumulates_across_batches() {
    let (state, app) = default_backend();

    let mut expected = 0;
    for _ in 0..5 {
        let body = get(&app, "/api/data?count=20").await.json();
        expected += body["errors"].as_u64().unwrap();
        assert_eq!(state.error_count(), expected);
    }
}

#[tokio::test]
async fn data_with_zero_count_is_empty() {
    let (state, app) = default_backend();

    let body = get(&app, "/api/data?count=0").await.json();

    assert_eq!(body["items"], json!([]));
    assert_eq!(body["count"], 0);
    assert_eq!(body["errors"], 0);
    assert_eq!(state.error_count(), 0);
}

#[tokio::test]
async fn data_defaults_to_ten_items() {
    let (_, app) = default_backend();

    let body = get(&app, "/api/data").await.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
}

// Non-numeric `count` is defaulted to zero, not rejected with 400.
#[tokio::test]
async fn data_with_non_numeric_count_defaults_to_zero() {
    let (_, app) = default_backend();

    let response = get(&app, "/api/data?count=abc").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["errors"], 0);
}

#[tokio::test]
async fn data_count_is_clamped_to_configured_maximum() {
    let (_, app) = backend_with(BackendConfig {
        data_max_items: 3,
        ..BackendConfig::default()
    });

    let body = get(&app, "/api/data?count=500").await.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn db_test_reflects_configuration() {
    let (_, app) = default_backend();
    let body = get(&app, "/api/db-test").await.json();
    assert_eq!(body["status"], "db_test");
    assert_eq!(body["configured"], false);
    assert_eq!(body["message"], "Database connection string is not configured");

    let (_, app) = backend_with(BackendConfig {
        connection_string: Some("Server=demo".to_string()),
        ..BackendConfig::default()
    });
    let body = get(&app, "/api/db-test").await.json();
    assert_eq!(body["configured"], true);
    assert_eq!(body["message"], "Database connection string is configured");
}

// === Backend routing, counters and CORS ===

#[tokio::test]
async fn unknown_paths_return_404_with_path_verbatim() {
    let (state, app) = default_backend();

    let paths = ["/", "/api", "/api/healthz", "/api/health/", "/Api/Health", "/x/y/z"];
    for path in paths {
        let response = get(&app, path).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", path);

        let body = response.json();
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], path);
        assert_eq!(body["availableEndpoints"], json!(ENDPOINTS));
    }

    assert_eq!(state.error_count(), paths.len() as u64);
}

#[tokio::test]
async fn request_counter_counts_every_request() {
    let (state, app) = default_backend();

    get(&app, "/api/health").await;
    get(&app, "/api/echo?a=b").await;
    get(&app, "/nowhere").await;
    call(&app, Method::OPTIONS, "/api/data").await;
    call(&app, Method::DELETE, "/api/metadata").await;
    get(&app, "/api/data?count=1").await;

    assert_eq!(state.request_count(), 6);

    let body = get(&app, "/api/status").await.json();
    assert_eq!(body["requestCount"], 7);
    assert_eq!(state.request_count(), 7);
}

#[tokio::test]
async fn request_counter_is_exact_under_concurrency() {
    let (state, app) = default_backend();

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let uri = if i % 2 == 0 { "/api/health" } else { "/missing" };
                get(&app, uri).await.status
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(state.request_count(), 50);
    assert_eq!(state.error_count(), 25);
}

#[tokio::test]
async fn options_returns_empty_200_with_cors_headers() {
    let (_, app) = default_backend();

    for path in ["/api/health", "/not/a/route"] {
        let response = call(&app, Method::OPTIONS, path).await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
        assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = response.headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("GET"), "{}", methods);
        assert!(response
            .headers
            .contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    }
}

#[tokio::test]
async fn cors_headers_present_on_regular_and_404_responses() {
    let (_, app) = default_backend();

    for path in ["/api/health", "/missing"] {
        let response = get(&app, path).await;
        assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}

// === Frontend ===

#[tokio::test]
async fn frontend_serves_page_health_and_404() {
    let app = frontend::create_router(FrontendState::new("http://backend.test:3001"));

    let health = get(&app, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json(), json!({"status": "healthy", "service": "frontend"}));

    let page = get(&app, "/").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = String::from_utf8(page.body).unwrap();
    assert!(html.contains(r#"const API_URL = "http://backend.test:3001";"#));

    let missing = get(&app, "/api/health").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json(), json!({"error": "Not Found", "path": "/api/health"}));
}

// === Probe against a live listener ===

#[tokio::test]
async fn probe_reads_every_endpoint_from_running_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (state, app) = default_backend();

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = build_client(std::time::Duration::from_secs(5)).unwrap();
    let results = probe_backend(&client, &format!("http://{}", addr)).await;

    assert_eq!(results.len(), PROBE_PATHS.len());
    for result in &results {
        assert!(result.is_success(), "{:?}", result);
        let body: Value = serde_json::from_str(&result.body).unwrap();
        assert!(body.is_object());
    }
    assert_eq!(state.request_count(), PROBE_PATHS.len() as u64);

    server.abort();
}
