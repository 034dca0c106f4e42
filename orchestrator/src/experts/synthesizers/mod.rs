// orchestrator/src/experts/synthesizers/mod.rs

pub mod boolean;
pub mod categorical;
pub mod comparison;

use search_core::OracleError;
use thiserror::Error;

/// Reply that tells us the column does not matter for the query.
pub const REMOVE_CONSTRAINT: &str = "REMOVE_CONSTRAINT";

/// Why a synthesizer produced no constraint. The builder logs it and moves on.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("oracle call failed for '{attribute}'")]
    Oracle {
        attribute: String,
        #[source]
        source: OracleError,
    },

    #[error("unexpected reply for '{attribute}': {reply:?}")]
    Malformed { attribute: String, reply: String },
}

impl SynthesisError {
    pub(crate) fn malformed(attribute: &str, reply: &str) -> Self {
        SynthesisError::Malformed {
            attribute: attribute.to_string(),
            reply: reply.to_string(),
        }
    }
}

pub(crate) fn is_removal(reply: &str) -> bool {
    reply.trim() == REMOVE_CONSTRAINT
}

pub(crate) fn oracle_failed(attribute: &str) -> impl FnOnce(OracleError) -> SynthesisError + '_ {
    move |source| SynthesisError::Oracle {
        attribute: attribute.to_string(),
        source,
    }
}
