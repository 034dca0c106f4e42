// orchestrator/src/experts/synthesizers/categorical.rs

use std::collections::BTreeSet;

use search_core::{Constraint, TextOracle};
use tracing::debug;

use super::{is_removal, oracle_failed, SynthesisError};

pub const SYSTEM_PROMPT: &str = "You are a column filter for hotel data.
Return ONLY a comma-separated list of values from the provided list,
OR exactly REMOVE_CONSTRAINT if none of them apply.
No extra words or explanations.";

pub fn get_categorical_prompt(column: &str, query: &str, possible: &BTreeSet<String>) -> String {
    let choices: Vec<&str> = possible.iter().map(String::as_str).collect();
    format!(
        "Column: {column}\nPossible values: {}\nUser query: {query}\nSelect all matching values.",
        choices.join(", ")
    )
}

/// Comma-separated subset of `possible`. Values outside the observed set
/// are dropped; an empty selection means no constraint.
pub fn parse_categorical_reply(
    column: &str,
    reply: &str,
    possible: &BTreeSet<String>,
) -> Result<Option<Constraint>, SynthesisError> {
    if is_removal(reply) {
        return Ok(None);
    }

    let mut selected = BTreeSet::new();
    for token in reply.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if possible.contains(token) {
            selected.insert(token.to_string());
        } else {
            debug!(column, value = token, "ignoring value not present in catalog");
        }
    }

    if selected.is_empty() {
        return Ok(None);
    }
    Ok(Some(Constraint::categorical(column, selected)))
}

pub async fn synthesize(
    oracle: &dyn TextOracle,
    column: &str,
    query: &str,
    possible: &BTreeSet<String>,
) -> Result<Option<Constraint>, SynthesisError> {
    let reply = oracle
        .ask(SYSTEM_PROMPT, &get_categorical_prompt(column, query, possible))
        .await
        .map_err(oracle_failed(column))?;
    parse_categorical_reply(column, &reply, possible)
}
