use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no response from interest service: {url}")]
    NoResponse { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("series shape mismatch for \"{term}\": {dates} dates but {values} values")]
    ShapeMismatch {
        term: String,
        dates: usize,
        values: usize,
    },
}
