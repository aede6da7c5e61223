use thiserror::Error;

/// Construction is the only fallible operation on the fetch client; requests
/// themselves never surface errors (see [`crate::FetchClient::get`]).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client construction failed: {0}")]
    Http(#[from] reqwest::Error),
}
