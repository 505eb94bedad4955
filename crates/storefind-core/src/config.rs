use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default endpoint of the Google Places nearby-search API.
const DEFAULT_PLACES_BASE_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !value.is_finite() || value < 1.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a finite number >= 1.0, got {raw}"),
            });
        }
        Ok(value)
    };

    let places_api_key = require("STOREFIND_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("STOREFIND_ENV", "development"));
    let log_level = or_default("STOREFIND_LOG_LEVEL", "info");
    let places_base_url = or_default("STOREFIND_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let user_agent = or_default("STOREFIND_USER_AGENT", "storefind/0.1 (store-search)");

    let request_timeout_secs = parse_u64("STOREFIND_REQUEST_TIMEOUT_SECS", "30")?;
    let page_delay_ms = parse_u64("STOREFIND_PAGE_DELAY_MS", "2000")?;
    let max_pages = parse_usize("STOREFIND_MAX_PAGES", "3")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFIND_MAX_PAGES".to_string(),
            reason: "must be at least 1; a search always fetches one page".to_string(),
        });
    }
    let max_attempts = parse_u32("STOREFIND_MAX_ATTEMPTS", "3")?;
    let radius_multiplier = parse_f64("STOREFIND_RADIUS_MULTIPLIER", "2.0")?;
    let max_retries = parse_u32("STOREFIND_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("STOREFIND_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        page_delay_ms,
        max_pages,
        max_attempts,
        radius_multiplier,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
