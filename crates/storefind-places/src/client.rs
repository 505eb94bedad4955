//! HTTP client for the places nearby-search API.
//!
//! Wraps `reqwest` with typed error handling, API key management, and
//! bounded token pagination. Every response's `"status"` field is checked;
//! anything other than `OK` or `ZERO_RESULTS` surfaces as
//! [`PlacesError::ApiStatus`].

use std::time::Duration;

use reqwest::{Client, Url};
use storefind_core::{AppConfig, Coordinate};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{NearbySearchResponse, RawPlace};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

const DEFAULT_USER_AGENT: &str = "storefind/0.1 (store-search)";

/// Category constraint sent with every nearby-search request.
const SEARCH_TYPE: &str = "grocery_or_supermarket";

/// Default pause before a pagination-token request. The API needs this long
/// before a freshly issued token becomes valid.
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Default bound on pages fetched per search, including the first.
const DEFAULT_MAX_PAGES: usize = 3;

/// Client for the places nearby-search API.
///
/// Manages the HTTP client, API key, endpoint URL, and pagination policy.
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    page_delay: Duration,
    max_pages: usize,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom endpoint URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Self::build(api_key, timeout_secs, base_url, DEFAULT_USER_AGENT)
    }

    fn build(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            page_delay: DEFAULT_PAGE_DELAY,
            max_pages: DEFAULT_MAX_PAGES,
            max_retries: 3,
            retry_backoff_base_ms: 1_000,
        })
    }

    /// Creates a fully wired client from application configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::with_base_url`].
    pub fn from_config(cfg: &AppConfig) -> Result<Self, PlacesError> {
        let client = Self::build(
            &cfg.places_api_key,
            cfg.request_timeout_secs,
            &cfg.places_base_url,
            &cfg.user_agent,
        )?;
        Ok(client
            .page_delay(Duration::from_millis(cfg.page_delay_ms))
            .max_pages(cfg.max_pages)
            .retry_policy(cfg.max_retries, cfg.retry_backoff_base_ms))
    }

    /// Overrides the pause before pagination-token requests. Tests use
    /// `Duration::ZERO` to avoid real sleeps.
    #[must_use]
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Overrides the page bound (including the first page). A search always
    /// fetches at least one page; a bound of 0 is clamped to 1.
    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Overrides the transient-error retry policy. `max_retries = 0`
    /// disables retries.
    #[must_use]
    pub fn retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches one page of nearby results, with automatic retry on
    /// transient errors (timeouts, connection failures, 5xx).
    ///
    /// `ZERO_RESULTS` is a success: the returned envelope simply carries an
    /// empty `results` list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiStatus`] — any status other than `OK`/`ZERO_RESULTS`.
    /// - [`PlacesError::Http`] — network failure or non-2xx HTTP status after
    ///   all retries.
    /// - [`PlacesError::Deserialize`] — body is not a valid response envelope.
    pub async fn nearby_page(
        &self,
        center: Coordinate,
        radius_m: u32,
        keyword: &str,
        pagetoken: Option<&str>,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let url = self.build_url(center, radius_m, keyword, pagetoken);

        let response = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            let url = url.clone();
            async move { self.request_envelope(&url).await }
        })
        .await?;

        if !response.is_success() {
            return Err(PlacesError::ApiStatus {
                status: response.status,
                message: response.error_message,
            });
        }
        Ok(response)
    }

    /// Fetches the union of all pages of nearby results.
    ///
    /// Follows `next_page_token` for at most the configured number of pages,
    /// sleeping the configured delay before each token request. The raw
    /// results are aggregated without deduplication; ranking owns that.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::nearby_page`].
    pub async fn nearby_all(
        &self,
        center: Coordinate,
        radius_m: u32,
        keyword: &str,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let mut collected: Vec<RawPlace> = Vec::new();
        let mut pagetoken: Option<String> = None;
        let mut page = 0usize;

        loop {
            if pagetoken.is_some() && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let response = self
                .nearby_page(center, radius_m, keyword, pagetoken.as_deref())
                .await?;
            page += 1;
            tracing::debug!(
                page,
                results = response.results.len(),
                has_next = response.next_page_token.is_some(),
                "fetched nearby-search page"
            );
            collected.extend(response.results);

            pagetoken = response.next_page_token;
            if pagetoken.is_none() || page >= self.max_pages {
                break;
            }
        }

        Ok(collected)
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters.
    fn build_url(
        &self,
        center: Coordinate,
        radius_m: u32,
        keyword: &str,
        pagetoken: Option<&str>,
    ) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("location", &center.to_string());
            pairs.append_pair("radius", &radius_m.to_string());
            pairs.append_pair("keyword", keyword);
            pairs.append_pair("type", SEARCH_TYPE);
            if let Some(token) = pagetoken {
                pairs.append_pair("pagetoken", token);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body
    /// as a response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body does not parse.
    async fn request_envelope(&self, url: &Url) -> Result<NearbySearchResponse, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("nearby search at {}", url.path()),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
