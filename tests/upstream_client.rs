//! Integration tests for `AirQualityClient` and the `/api/nearest` fetch path.
//!
//! Uses `wiremock` to stand up a local HTTP server per test, so no real
//! network traffic is made.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use check_air_quality::api::{AppState, router};
use check_air_quality::config::UpstreamConfig;
use check_air_quality::{AirQualityClient, AirQualityError};

/// Client pointed at the mock server: 5-second timeout, `max_retries` retries.
fn test_client(server: &MockServer, max_retries: u32) -> AirQualityClient {
    let config = UpstreamConfig {
        forecasts_url: format!("{}/forecast", server.uri()),
        measurements_url: format!("{}/measurements", server.uri()),
        timeout_seconds: 5,
        max_retries,
    };
    AirQualityClient::new(&config).expect("failed to build test AirQualityClient")
}

fn forecasts_json() -> Value {
    json!([{
        "name": "Belfast",
        "location": { "type": "Point", "coordinates": [54.6, -5.9] },
        "forecast": [{ "day": "Xyz", "value": 3 }]
    }])
}

fn measurements_json() -> Value {
    json!({
        "measurements": [{
            "name": "Belfast Centre",
            "localSiteID": "BEL2",
            "location": { "type": "Point", "coordinates": [54.6, -5.93] },
            "pollutants": {
                "NO2": { "value": 30, "time": { "date": "2024-03-04 10:00:00" } }
            }
        }]
    })
}

#[tokio::test]
async fn fetch_forecasts_reads_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecasts_json()))
        .expect(1)
        .mount(&server)
        .await;

    let sites = test_client(&server, 0)
        .fetch_forecasts()
        .await
        .expect("forecasts");

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Belfast");
    assert_eq!(sites[0].forecast[0].value, 3);
}

#[tokio::test]
async fn fetch_measurements_reads_wrapped_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(measurements_json()))
        .mount(&server)
        .await;

    let sites = test_client(&server, 0)
        .fetch_measurements()
        .await
        .expect("measurements");

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].local_site_id.as_deref(), Some("BEL2"));
    assert_eq!(sites[0].pollutants["NO2"].usable_value(), Some(30.0));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("maintenance window"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 0)
        .fetch_forecasts()
        .await
        .expect_err("500 should fail");

    assert!(matches!(err, AirQualityError::Upstream { .. }));
    let message = err.to_string();
    assert!(message.contains("500"), "got: {message}");
    assert!(message.contains("maintenance window"), "got: {message}");
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecasts_json()))
        .expect(1)
        .mount(&server)
        .await;

    let sites = test_client(&server, 2)
        .fetch_forecasts()
        .await
        .expect("retry should recover");

    assert_eq!(sites.len(), 1);
}

async fn post_nearest(state: AppState, body: &Value) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/nearest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn ni_request() -> Value {
    json!({
        "matches": [{ "xCoordinate": -5.93, "yCoordinate": 54.6 }],
        "locationType": "ni-location"
    })
}

#[tokio::test]
async fn nearest_fetches_missing_collections_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecasts_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(measurements_json()))
        .expect(1)
        .mount(&server)
        .await;

    let state = AppState {
        client: Some(Arc::new(test_client(&server, 0))),
    };
    let (status, json) = post_nearest(state, &ni_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["forecastNum"], json!([[{ "Xyz": 3 }]]));
    let site = &json["nearestLocationsRange"][0];
    assert_eq!(site["localSiteID"], "BEL2");
    assert_eq!(site["pollutants"]["NO2"]["band"], "Low");
}

#[tokio::test]
async fn nearest_reports_upstream_failure_as_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = AppState {
        client: Some(Arc::new(test_client(&server, 0))),
    };
    let (status, json) = post_nearest(state, &ni_request()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "upstream");
}
