// orchestrator/src/experts/validity.rs

use search_core::TextOracle;
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = "You are a hotel search request validator.";

pub fn get_validity_prompt(request: &str) -> String {
    format!(
        r#"You are an assistant that checks whether a user request is suitable for a hotel search.

A request is **valid** if it expresses specific needs, wishes, preferences, or requirements related to a hotel stay - for example, amenities, location, price, type of hotel, accessibility, nearby attractions, food options, etc.

A request is **invalid** if it:
- Asks unrelated questions (e.g., about games, finance, travel tips, etc.)
- Mentions no hotel-related features, amenities, or booking intent
- Is purely general (e.g., 'Tell me something funny') or about other travel aspects (e.g., flights, car rentals)

Now analyze the following user request:

"""{request}"""

Respond with exactly one word: **'valid'** or **'invalid'**."#
    )
}

/// Only a literal `invalid` (any case, ignoring quotes and emphasis) rejects.
pub fn is_invalid_verdict(reply: &str) -> bool {
    normalize_verdict(reply).eq_ignore_ascii_case("invalid")
}

pub(crate) fn normalize_verdict(reply: &str) -> &str {
    reply.trim().trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '\'' | '"' | '*' | '`' | '.')
    })
}

/// Fails closed: blank input or an unreachable oracle counts as invalid.
pub async fn is_valid_request(oracle: &dyn TextOracle, request: &str) -> bool {
    if request.trim().is_empty() {
        debug!("empty request, rejecting");
        return false;
    }

    match oracle.ask(SYSTEM_PROMPT, &get_validity_prompt(request)).await {
        Ok(reply) => {
            let valid = !is_invalid_verdict(&reply);
            debug!(verdict = %reply.trim(), valid, "validity classified");
            valid
        }
        Err(e) => {
            warn!(error = %e, "validity check failed, treating request as invalid");
            false
        }
    }
}
