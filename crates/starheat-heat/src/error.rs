use thiserror::Error;

/// Cache persistence is the one hard failure class in the aggregator:
/// losing write-through durability would silently void the resumability
/// contract, so it propagates instead of degrading.
#[derive(Debug, Error)]
pub enum HeatError {
    #[error("ratio cache I/O error on {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ratio cache serialization error: {0}")]
    CacheEncode(#[from] serde_json::Error),
}
