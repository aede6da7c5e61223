//! Search-interest time-series collection.
//!
//! The interest provider caps keywords per call, so the roster is driven
//! through it in fixed-size batches with randomized pacing. A failing batch
//! is discarded after a long cooldown; it never aborts the collection.

pub mod collector;
pub mod error;
pub mod source;

pub use collector::{collect_interest_series, CollectorConfig};
pub use error::TrendsError;
pub use source::{SignalSource, TrendsHttpSource, WideSeries};
