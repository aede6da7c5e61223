//! Shared vocabulary for the starheat workspace: application configuration,
//! the entity roster, period bucketing, and flat-table I/O.

pub mod app_config;
pub mod config;
pub mod error;
pub mod period;
pub mod roster;
pub mod table;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, TableError};
pub use period::{Granularity, PeriodKey};
pub use roster::{load_roster, EntityConfig};
pub use table::{RawSeriesRow, SeriesRow};
