use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::error::ConfigError;

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

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let settings_path = PathBuf::from(or_default("PRICETRACK_SETTINGS_PATH", "./config.yml"));
    let webdriver_url = or_default("PRICETRACK_WEBDRIVER_URL", "http://localhost:4444");
    let base_url = or_default("PRICETRACK_BASE_URL", "https://www.notino.fr");
    let log_level = or_default("PRICETRACK_LOG_LEVEL", "info");
    let poll_interval_ms = parse_u64("PRICETRACK_POLL_INTERVAL_MS", "100")?;

    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICETRACK_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        settings_path,
        webdriver_url,
        base_url,
        log_level,
        poll_interval_ms,
    })
}
