//! Resumable fusion of the interest time series with periodic
//! news-sentiment ratios into the decomposed heat metric.
//!
//! The only durable mutable state in the pipeline lives here: a flat
//! key→ratio cache persisted write-through so an interrupted run can resume
//! without redoing completed lookups.

pub mod aggregate;
pub mod cache;
pub mod error;

pub use aggregate::{
    decompose_heat, AggregateConfig, AggregateOutcome, DecomposedRow, RatioSource, StopSignal,
};
pub use cache::RatioCache;
pub use error::HeatError;
