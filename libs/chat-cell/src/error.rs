use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation timed out")]
    Timeout,

    #[error("Malformed generation response: {0}")]
    Decode(String),

    #[error("Generation service returned an empty response")]
    EmptyResponse,

    #[error("Generation is not configured")]
    NotConfigured,
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Unknown knowledge collection: {0}")]
    UnknownCollection(String),

    #[error("Knowledge index unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read knowledge documents: {0}")]
    Io(#[from] std::io::Error),
}

/// A recoverable failure of one tier. Absorbed by falling to the next tier.
#[derive(Error, Debug)]
pub enum Fault {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("Retrieval returned no context")]
    NoContext,

    #[error("Tier timed out after {0:?}")]
    Timeout(Duration),

    #[error("Tier produced empty text")]
    Empty,
}
