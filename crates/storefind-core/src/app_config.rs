#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// API key for the external places search service.
    pub places_api_key: String,
    /// Base URL of the places search endpoint. Overridden in tests to point
    /// at a mock server.
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Delay before a pagination token request. The places API requires this
    /// pause before a freshly issued token becomes valid.
    pub page_delay_ms: u64,
    /// Maximum pages fetched per search request, including the first.
    pub max_pages: usize,
    /// Total search attempts before reporting a no-results outcome.
    pub max_attempts: u32,
    /// Radius escalation factor applied between empty attempts.
    pub radius_multiplier: f64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("max_pages", &self.max_pages)
            .field("max_attempts", &self.max_attempts)
            .field("radius_multiplier", &self.radius_multiplier)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
