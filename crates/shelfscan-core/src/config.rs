use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, RetrySettings};
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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    // Blank counts as unset, so an empty override never replaces a default.
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    // Unset and blank are both treated as "not configured".
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_positive = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_value::<u64>(var, &or_default(var, default))?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value::<u64>(var, &or_default(var, default))
    };

    let town = require("SHELFSCAN_TOWN")?;
    let region = require("SHELFSCAN_REGION")?;
    let categories_url = require("SHELFSCAN_CATEGORIES_URL")?;
    let items_url = require("SHELFSCAN_ITEMS_URL")?;

    let user_agent = or_default("SHELFSCAN_USER_AGENT", "shelfscan/0.1 (catalog-export)");
    let proxy_url = optional("SHELFSCAN_PROXY_URL");
    let category_id = optional("SHELFSCAN_CATEGORY_ID");
    let category_limit = optional("SHELFSCAN_CATEGORY_LIMIT")
        .map(|raw| parse_value::<usize>("SHELFSCAN_CATEGORY_LIMIT", &raw))
        .transpose()?;
    let output_path = PathBuf::from(or_default("SHELFSCAN_OUTPUT_PATH", "./catalog.csv"));
    let log_level = or_default("SHELFSCAN_LOG_LEVEL", "info");

    let request_timeout_secs = parse_positive("SHELFSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let max_concurrent_requests = usize::try_from(parse_positive(
        "SHELFSCAN_MAX_CONCURRENT_REQUESTS",
        "10",
    )?)
    .map_err(|e| ConfigError::InvalidEnvVar {
        var: "SHELFSCAN_MAX_CONCURRENT_REQUESTS".to_string(),
        reason: e.to_string(),
    })?;
    let page_size = parse_positive("SHELFSCAN_PAGE_SIZE", "200")?;

    let max_attempts = u32::try_from(parse_positive("SHELFSCAN_MAX_ATTEMPTS", "5")?).map_err(
        |e| ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_MAX_ATTEMPTS".to_string(),
            reason: e.to_string(),
        },
    )?;
    let base_delay_secs = parse_u64("SHELFSCAN_RETRY_BASE_DELAY_SECS", "4")?;
    let multiplier_secs = parse_u64("SHELFSCAN_RETRY_MULTIPLIER_SECS", "1")?;
    let max_delay_secs = parse_u64("SHELFSCAN_RETRY_MAX_DELAY_SECS", "10")?;
    if max_delay_secs < base_delay_secs {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_RETRY_MAX_DELAY_SECS".to_string(),
            reason: format!(
                "must not be lower than SHELFSCAN_RETRY_BASE_DELAY_SECS ({base_delay_secs})"
            ),
        });
    }

    Ok(AppConfig {
        town,
        region,
        categories_url,
        items_url,
        user_agent,
        proxy_url,
        category_id,
        category_limit,
        output_path,
        log_level,
        request_timeout_secs,
        max_concurrent_requests,
        page_size,
        retry: RetrySettings {
            max_attempts,
            base_delay_secs,
            multiplier_secs,
            max_delay_secs,
        },
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
