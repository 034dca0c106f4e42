// orchestrator/src/experts/restriction.rs

use search_core::{OracleError, TextOracle};
use thiserror::Error;
use tracing::debug;

use super::validity::normalize_verdict;

pub const SYSTEM_PROMPT: &str = "You are a hotel-query classifier.
Respond with ONE word only:
  UNRESTRICTED – if the user gives NO explicit filters beyond a general wish to see hotels (number of guests alone does NOT count as a filter).
  RESTRICTED   – if the user mentions ANY concrete preference or constraint, including but not limited to:
      • price, budget, or currency amounts
      • star rating or review score
      • amenities (pool, spa, parking, pets, breakfast, etc.)
      • distance or location modifiers (near beach, city centre, …)
      • dates, duration, check-in or check-out
      • room type (suite, apartment, etc.)
      • accessibility, pet policy, view, theme, etc.
No additional words or punctuation.";

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("restriction classification failed")]
    Oracle(#[from] OracleError),
}

pub fn get_restriction_prompt(request: &str) -> String {
    format!(r#"User prompt: """{request}""""#)
}

pub fn is_unrestricted_verdict(reply: &str) -> bool {
    normalize_verdict(reply).eq_ignore_ascii_case("UNRESTRICTED")
}

/// `true` when the query carries no concrete filter. Blank input is
/// unrestricted; oracle failures are returned for the caller to decide.
pub async fn is_unrestricted_request(
    oracle: &dyn TextOracle,
    request: &str,
) -> Result<bool, ClassificationError> {
    if request.trim().is_empty() {
        return Ok(true);
    }

    let reply = oracle.ask(SYSTEM_PROMPT, &get_restriction_prompt(request)).await?;
    let unrestricted = is_unrestricted_verdict(&reply);
    debug!(verdict = %reply.trim(), unrestricted, "restriction classified");
    Ok(unrestricted)
}
