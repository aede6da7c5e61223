//! GDELT Doc 2.1 news-sentiment source.
//!
//! Supplies the negative-news ratio the aggregator joins against the
//! interest series. Every failure path — transport, status, parse, empty
//! result — resolves to exactly 0.0; the ratio is data, never an error.

pub mod client;

pub use client::GdeltClient;
