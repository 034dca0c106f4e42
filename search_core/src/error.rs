// search_core/src/error.rs

use thiserror::Error;

/// Failure talking to the text oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        OracleError::Transport(Box::new(err))
    }
}
