// orchestrator/src/experts/synthesizers/comparison.rs

use search_core::{ComparisonOperator, Constraint, TextOracle};

use super::{is_removal, oracle_failed, SynthesisError};

pub const SYSTEM_PROMPT: &str = "You are a column filter for hotel data.
Allowed response format (single line, NO spaces):
  <operator>,<number>
Where <operator> is one of < > <= >= ==
OR exactly: REMOVE_CONSTRAINT if the column is not relevant.
Do not add explanations.

Additional rules:
- Distances are measured in kilometers.
- Star ratings (starcategory) are on a scale of 1 to 5.
- If the user specifies a location preference (e.g., 'near the beach', 'close to city center') but does not give an explicit number, you must reasonably estimate a suitable threshold based on typical expectations.
- Choose thresholds that make sense in context (e.g., walking distance to downtown might imply 1 km or less).
- You must still return the answer strictly in the defined format.";

pub fn get_comparison_prompt(column: &str, query: &str) -> String {
    format!(
        "Column: {column}\nUser query: {query}\nIf relevant, return the appropriate numeric comparison."
    )
}

/// `<operator>,<number>` or the removal sentinel.
pub fn parse_comparison_reply(column: &str, reply: &str) -> Result<Option<Constraint>, SynthesisError> {
    if is_removal(reply) {
        return Ok(None);
    }
    let (op, number) = reply
        .trim()
        .split_once(',')
        .ok_or_else(|| SynthesisError::malformed(column, reply))?;
    let operator: ComparisonOperator = op
        .parse()
        .map_err(|_| SynthesisError::malformed(column, reply))?;
    let threshold: f64 = number
        .trim()
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| SynthesisError::malformed(column, reply))?;
    Ok(Some(Constraint::comparison(column, operator, threshold)))
}

pub async fn synthesize(
    oracle: &dyn TextOracle,
    column: &str,
    query: &str,
) -> Result<Option<Constraint>, SynthesisError> {
    let reply = oracle
        .ask(SYSTEM_PROMPT, &get_comparison_prompt(column, query))
        .await
        .map_err(oracle_failed(column))?;
    parse_comparison_reply(column, &reply)
}
