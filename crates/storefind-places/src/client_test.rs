use std::time::Duration;

use storefind_core::Coordinate;

use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_constructs_correct_query_string() {
    let client = test_client("https://places.example.com/nearby/json");
    let url = client.build_url(Coordinate::new(47.6, -122.33), 5000, "milk", None);
    assert_eq!(
        url.as_str(),
        "https://places.example.com/nearby/json?key=test-key&location=47.6%2C-122.33&radius=5000&keyword=milk&type=grocery_or_supermarket"
    );
}

#[test]
fn build_url_appends_pagetoken_when_present() {
    let client = test_client("https://places.example.com/nearby/json");
    let url = client.build_url(
        Coordinate::new(47.6, -122.33),
        5000,
        "milk",
        Some("TOKEN123"),
    );
    assert!(
        url.as_str().ends_with("&pagetoken=TOKEN123"),
        "pagetoken should be the last parameter: {url}"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://places.example.com/nearby/json");
    let url = client.build_url(Coordinate::new(47.6, -122.33), 5000, "bread & butter", None);
    assert!(
        url.as_str().contains("bread+%26+butter") || url.as_str().contains("bread%20%26%20butter"),
        "keyword should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("test-key", 30, "not a url");
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
}

#[test]
fn builder_overrides_are_applied() {
    let client = test_client("https://places.example.com/nearby/json")
        .page_delay(Duration::ZERO)
        .max_pages(1)
        .retry_policy(0, 0);
    assert_eq!(client.page_delay, Duration::ZERO);
    assert_eq!(client.max_pages, 1);
    assert_eq!(client.max_retries, 0);
}

#[test]
fn max_pages_zero_is_clamped_to_one() {
    let client = test_client("https://places.example.com/nearby/json").max_pages(0);
    assert_eq!(client.max_pages, 1, "a search always fetches one page");
}
