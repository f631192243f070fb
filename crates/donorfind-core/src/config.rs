use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let raw_url = or_default("DONORFIND_API_URL", "http://localhost:8000");
    let api_url = parse_api_url(&raw_url).map_err(|reason| invalid("DONORFIND_API_URL", reason))?;

    let env = parse_environment(&or_default("DONORFIND_ENV", "development"));
    let log_level = or_default("DONORFIND_LOG_LEVEL", "info");

    let http_timeout_secs = parse_u64("DONORFIND_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DONORFIND_USER_AGENT", "donorfind/0.1 (donor-research)");
    let list_limit = parse_u32("DONORFIND_LIST_LIMIT", "25")?;
    let semantic_limit = parse_u32("DONORFIND_SEMANTIC_LIMIT", "10")?;

    // An explicitly empty value means "any state".
    let default_state = {
        let raw = or_default("DONORFIND_DEFAULT_STATE", "CA");
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
    };

    let ledger_path = PathBuf::from(or_default("DONORFIND_LEDGER_PATH", ".donorfind/auto_enrich"));

    Ok(AppConfig {
        api_url,
        env,
        log_level,
        http_timeout_secs,
        user_agent,
        list_limit,
        semantic_limit,
        default_state,
        ledger_path,
    })
}

/// Parse the API base address, accepting only `http` and `https` URLs.
fn parse_api_url(raw: &str) -> Result<reqwest::Url, String> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
