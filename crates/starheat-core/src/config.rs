use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::period::Granularity;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value is invalid. Every variable has
/// a default, so a bare environment always loads.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup.
///
/// The parsing/validation logic is decoupled from the real environment so it
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_delay_range =
        |min_var: &str, min_default: &str, max_var: &str, max_default: &str| -> Result<(f64, f64), ConfigError> {
            let min = parse_f64(min_var, min_default)?;
            let max = parse_f64(max_var, max_default)?;
            if min < 0.0 || max < min {
                return Err(ConfigError::InvalidEnvVar {
                    var: max_var.to_string(),
                    reason: format!("delay range [{min}, {max}] is not a valid interval"),
                });
            }
            Ok((min, max))
        };

    let heat_max_new_pairs = match lookup("STARHEAT_HEAT_MAX_NEW_PAIRS") {
        Ok(raw) => Some(raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "STARHEAT_HEAT_MAX_NEW_PAIRS".to_string(),
            reason: e.to_string(),
        })?),
        Err(_) => None,
    };

    Ok(AppConfig {
        log_level: or_default("STARHEAT_LOG_LEVEL", "info"),
        roster_path: PathBuf::from(or_default("STARHEAT_ROSTER_PATH", "./config/roster.yaml")),

        user_agent: or_default(
            "STARHEAT_USER_AGENT",
            "starheat/0.1 (attention-research; mailto:ops@example.com)",
        ),
        http_timeout_secs: parse_u64("STARHEAT_HTTP_TIMEOUT_SECS", "20")?,
        http_max_attempts: parse_u32("STARHEAT_HTTP_MAX_ATTEMPTS", "3")?,
        http_backoff_base_secs: parse_u64("STARHEAT_HTTP_BACKOFF_BASE_SECS", "2")?,

        trends_base_url: or_default("STARHEAT_TRENDS_BASE_URL", "http://localhost:8886"),
        trends_geo: or_default("STARHEAT_TRENDS_GEO", "US"),
        trends_timeframe: or_default("STARHEAT_TRENDS_TIMEFRAME", "all"),
        trends_delay_secs: parse_delay_range(
            "STARHEAT_TRENDS_DELAY_MIN_SECS",
            "10",
            "STARHEAT_TRENDS_DELAY_MAX_SECS",
            "20",
        )?,
        trends_cooldown_secs: parse_u64("STARHEAT_TRENDS_COOLDOWN_SECS", "60")?,
        disambiguation_suffix: or_default("STARHEAT_DISAMBIGUATION_SUFFIX", "celebrity"),

        social_delay_secs: parse_delay_range(
            "STARHEAT_SOCIAL_DELAY_MIN_SECS",
            "1.5",
            "STARHEAT_SOCIAL_DELAY_MAX_SECS",
            "3.0",
        )?,

        heat_delay_secs: parse_delay_range(
            "STARHEAT_HEAT_DELAY_MIN_SECS",
            "1.0",
            "STARHEAT_HEAT_DELAY_MAX_SECS",
            "2.0",
        )?,
        heat_granularity: Granularity::parse(&or_default("STARHEAT_GRANULARITY", "month")),
        heat_cache_path: PathBuf::from(or_default(
            "STARHEAT_CACHE_PATH",
            "./starheat_cache.json",
        )),
        heat_max_new_pairs,
    })
}
