use thiserror::Error;

/// Errors returned by the places search client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a status other than `OK` or `ZERO_RESULTS`
    /// (e.g. `INVALID_REQUEST`, `OVER_QUERY_LIMIT`, `REQUEST_DENIED`).
    #[error("places API error: {status}{}", .message.as_ref().map(|m| format!(" ({m})")).unwrap_or_default())]
    ApiStatus {
        status: String,
        message: Option<String>,
    },

    /// The configured endpoint URL could not be parsed.
    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
