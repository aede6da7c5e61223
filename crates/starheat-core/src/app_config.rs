use std::path::PathBuf;

use crate::period::Granularity;

/// Immutable application configuration, loaded once from the environment and
/// passed into each component at construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub roster_path: PathBuf,

    /// User-Agent sent on every outbound request.
    pub user_agent: String,
    pub http_timeout_secs: u64,
    /// Total attempts per request, including the first.
    pub http_max_attempts: u32,
    /// Backoff before retry n is `http_backoff_base_secs ^ n` seconds.
    pub http_backoff_base_secs: u64,

    pub trends_base_url: String,
    pub trends_geo: String,
    pub trends_timeframe: String,
    /// Randomized delay between successful batches, seconds.
    pub trends_delay_secs: (f64, f64),
    /// Fixed cooldown after a failed batch, seconds.
    pub trends_cooldown_secs: u64,
    /// Suffix appended to the query term of ambiguous roster entries.
    pub disambiguation_suffix: String,

    /// Randomized delay between per-entity social resolutions, seconds.
    pub social_delay_secs: (f64, f64),

    /// Randomized delay between sentiment-ratio lookups, seconds.
    pub heat_delay_secs: (f64, f64),
    pub heat_granularity: Granularity,
    pub heat_cache_path: PathBuf,
    /// Optional cap on new (entity, period) pairs resolved in one run.
    pub heat_max_new_pairs: Option<usize>,
}
