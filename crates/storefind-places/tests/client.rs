//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use std::time::Duration;

use storefind_core::{AppConfig, Coordinate, Environment};
use storefind_places::{PlacesClient, PlacesError};
use wiremock::matchers::{header, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .page_delay(Duration::ZERO)
        .retry_policy(0, 0)
}

fn user() -> Coordinate {
    Coordinate::new(47.60, -122.33)
}

fn place_json(id: &str, name: &str, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "name": name,
        "vicinity": "Somewhere Ave",
        "geometry": { "location": { "lat": lat, "lng": lng } },
        "types": ["grocery_or_supermarket", "store"]
    })
}

#[tokio::test]
async fn nearby_page_parses_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "p1",
                "name": "Fresh Mart",
                "vicinity": "1 Pike St",
                "geometry": { "location": { "lat": 47.61, "lng": -122.34 } },
                "types": ["grocery_or_supermarket"],
                "rating": 4.2,
                "user_ratings_total": 310,
                "opening_hours": { "open_now": true }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(query_param("key", "test-key"))
        .and(query_param("keyword", "milk"))
        .and(query_param("radius", "5000"))
        .and(query_param("type", "grocery_or_supermarket"))
        .and(query_param("location", "47.6,-122.33"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .nearby_page(user(), 5000, "milk", None)
        .await
        .expect("should parse envelope");

    assert_eq!(response.status, "OK");
    assert_eq!(response.results.len(), 1);
    let place = &response.results[0];
    assert_eq!(place.place_id.as_deref(), Some("p1"));
    assert_eq!(place.name, "Fresh Mart");
    assert_eq!(place.address(), Some("1 Pike St"));
    assert_eq!(place.rating, Some(4.2));
    assert_eq!(place.user_ratings_total, Some(310));
    assert_eq!(
        place.opening_hours.as_ref().and_then(|h| h.open_now),
        Some(true)
    );
}

#[tokio::test]
async fn zero_results_is_a_success_with_empty_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .nearby_page(user(), 5000, "milk", None)
        .await
        .expect("ZERO_RESULTS is not an error");
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn error_status_returns_api_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "INVALID_REQUEST",
        "error_message": "Missing the location parameter."
    });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_page(user(), 5000, "milk", None).await;

    match result {
        Err(PlacesError::ApiStatus { status, message }) => {
            assert_eq!(status, "INVALID_REQUEST");
            assert_eq!(message.as_deref(), Some("Missing the location parameter."));
        }
        other => panic!("expected ApiStatus error, got: {other:?}"),
    }
}

#[tokio::test]
async fn nearby_all_follows_pagination_tokens() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "status": "OK",
        "results": [place_json("a", "Store A", 47.61, -122.34)],
        "next_page_token": "tok-2"
    });
    let page2 = serde_json::json!({
        "status": "OK",
        "results": [place_json("b", "Store B", 47.62, -122.35)]
    });

    Mock::given(method("GET"))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .nearby_all(user(), 5000, "milk")
        .await
        .expect("pagination should succeed");

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].place_id.as_deref(), Some("a"));
    assert_eq!(places[1].place_id.as_deref(), Some("b"));
}

#[tokio::test]
async fn nearby_all_fetches_at_most_three_pages() {
    let server = MockServer::start().await;

    // Every response advertises another page; the client must stop at 3.
    let body = serde_json::json!({
        "status": "OK",
        "results": [place_json("x", "Loop Mart", 47.61, -122.34)],
        "next_page_token": "tok-again"
    });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .nearby_all(user(), 5000, "milk")
        .await
        .expect("bounded pagination should succeed");

    assert_eq!(places.len(), 3, "one result per page, three pages max");
    server.verify().await;
}

#[tokio::test]
async fn nearby_all_stops_on_error_status_mid_pagination() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "status": "OK",
        "results": [place_json("a", "Store A", 47.61, -122.34)],
        "next_page_token": "tok-2"
    });
    let page2 = serde_json::json!({ "status": "OVER_QUERY_LIMIT" });

    Mock::given(method("GET"))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_all(user(), 5000, "milk").await;
    assert!(matches!(result, Err(PlacesError::ApiStatus { .. })));
}

#[tokio::test]
async fn from_config_sends_configured_user_agent() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
    // Matches only when the request carries the configured agent header.
    Mock::given(method("GET"))
        .and(header("user-agent", "custom-agent/9.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = AppConfig {
        env: Environment::Test,
        log_level: "info".to_owned(),
        places_api_key: "test-key".to_owned(),
        places_base_url: server.uri(),
        request_timeout_secs: 30,
        user_agent: "custom-agent/9.9".to_owned(),
        page_delay_ms: 0,
        max_pages: 3,
        max_attempts: 3,
        radius_multiplier: 2.0,
        max_retries: 0,
        retry_backoff_base_ms: 0,
    };
    let client = PlacesClient::from_config(&cfg).expect("client construction should not fail");

    client
        .nearby_page(user(), 5000, "milk", None)
        .await
        .expect("request should match the configured agent header");
    server.verify().await;
}

#[tokio::test]
async fn non_2xx_http_status_is_an_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_page(user(), 5000, "milk", None).await;
    assert!(matches!(result, Err(PlacesError::Http(_))));
}
