//! Resilient outbound HTTP for starheat.
//!
//! Every external source in the pipeline is reached through [`FetchClient`]:
//! bounded attempts, exponential backoff on transient failures, immediate
//! return on permanent statuses. Failure is expressed as an absent result or
//! a non-2xx response, never as an error — callers decide what a missing
//! response means for their field.

pub mod client;
pub mod error;

pub use client::{FetchClient, RETRYABLE_STATUS};
pub use error::FetchError;
