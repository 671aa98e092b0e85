use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let pos_base_url = require("POS_API_BASE_URL")?;
    let pos_user = require("POS_API_USER")?;
    let pos_password = require("POS_API_PASSWORD")?;
    let pos_rtd = require("POS_API_RTD")?;
    let shopify_shop_domain = require("SHOPIFY_SHOP_DOMAIN")?;
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("SHOPSYNC_ENV", "development"))?;
    let bind_addr = parse_addr("SHOPSYNC_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPSYNC_LOG_LEVEL", "info");
    let api_keys = or_default("SHOPSYNC_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let db_max_connections = parse_u32("SHOPSYNC_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("SHOPSYNC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SHOPSYNC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "SHOPSYNC_DB_MIN_CONNECTIONS",
            format!("must not exceed SHOPSYNC_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let pos_token_ttl_secs = parse_u64("POS_TOKEN_TTL_SECS", "3500")?;
    if pos_token_ttl_secs == 0 || pos_token_ttl_secs >= 3600 {
        return Err(invalid(
            "POS_TOKEN_TTL_SECS",
            "must be between 1 and 3599 seconds".to_string(),
        ));
    }
    let pos_request_timeout_secs = parse_u64("POS_REQUEST_TIMEOUT_SECS", "60")?;

    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2025-07");
    let shopify_request_timeout_secs = parse_u64("SHOPIFY_REQUEST_TIMEOUT_SECS", "60")?;
    let shopify_max_retries = parse_u32("SHOPIFY_MAX_RETRIES", "3")?;
    let shopify_retry_backoff_base_secs = parse_u64("SHOPIFY_RETRY_BACKOFF_BASE_SECS", "2")?;

    let sync_throttle_every = parse_usize("SHOPSYNC_THROTTLE_EVERY", "20")?;
    let sync_throttle_pause_ms = parse_u64("SHOPSYNC_THROTTLE_PAUSE_MS", "50")?;
    let sync_cron = lookup("SHOPSYNC_SYNC_CRON")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let menu_output_dir = PathBuf::from(or_default(
        "SHOPSYNC_MENU_OUTPUT_DIR",
        "./storage/mega_menu",
    ));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        pos_base_url,
        pos_user,
        pos_password,
        pos_rtd,
        pos_token_ttl_secs,
        pos_request_timeout_secs,
        shopify_shop_domain,
        shopify_access_token,
        shopify_api_version,
        shopify_request_timeout_secs,
        shopify_max_retries,
        shopify_retry_backoff_base_secs,
        sync_throttle_every,
        sync_throttle_pause_ms,
        sync_cron,
        menu_output_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPSYNC_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
