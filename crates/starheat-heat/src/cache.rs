//! The durable (entity, period) → ratio store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use starheat_core::PeriodKey;

use crate::error::HeatError;

/// Flat JSON object mapping `"{entity}||{period}"` to a ratio in [0, 1].
///
/// Entries are added monotonically during a run — never deleted or
/// overwritten — and flushed to disk after every insert plus once more at
/// run end. Persistence writes a temp file and renames it into place, so a
/// crash leaves either the previous cache or the new one, never a torn file;
/// at most the entry in flight is lost.
pub struct RatioCache {
    path: PathBuf,
    entries: BTreeMap<String, f64>,
}

impl RatioCache {
    /// Composite cache key for one (entity, period) pair.
    #[must_use]
    pub fn key(entity: &str, period: &PeriodKey) -> String {
        format!("{entity}||{period}")
    }

    /// Load the cache from `path`, or start empty when the file is missing.
    ///
    /// A corrupt file also degrades to an empty cache with a warning — the
    /// worst case is redoing lookups, which the pipeline tolerates.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, f64>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ratio cache is corrupt — starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Record a resolved ratio and flush the whole cache to disk.
    ///
    /// Inserts are monotonic: an existing entry is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`HeatError`] if the flush fails.
    pub fn insert_and_persist(&mut self, key: String, ratio: f64) -> Result<(), HeatError> {
        self.entries.entry(key).or_insert(ratio);
        self.persist()
    }

    /// Flush the cache to its file via temp-file-and-rename.
    ///
    /// # Errors
    ///
    /// Returns [`HeatError`] if encoding or either I/O step fails.
    pub fn persist(&self) -> Result<(), HeatError> {
        let json = serde_json::to_string(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source: std::io::Error| HeatError::CacheIo {
            path: self.path.display().to_string(),
            source,
        };
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
