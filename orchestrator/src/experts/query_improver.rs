// orchestrator/src/experts/query_improver.rs

use search_core::{OracleError, TextOracle};
use tracing::{debug, warn};

pub fn get_improvement_prompt(query: &str, vocabulary: &[String]) -> String {
    format!(
        r#"You are a travel assistant that improves hotel search queries.

Your job is to strictly rewrite the user's hotel search prompt to make it:
- More structured and specific
- Explicitly aligned with the following hotel database fields:
{fields}

Important Rules:
- Do NOT add any information that is not clearly stated in the original request.
- Do NOT assume or guess additional needs.
- ONLY rephrase or clarify what the user already asked for.
- Preserve the original intent exactly.
- Keep the language natural and friendly, as if a real user wrote it.

Response Format:
- Respond only with the improved query text.
- Do not add any explanations or extra text outside the query.

Example:
Original: "Need hotel with pool and breakfast."
Improved: "I'm looking for a hotel that offers a pool and provides breakfast."

Now, improve the following hotel search request:

"""{query}""""#,
        fields = vocabulary.join(","),
    )
}

/// Rewrites `query` against the attribute vocabulary. An empty rewrite
/// falls back to the original query.
pub async fn improve_query(
    oracle: &dyn TextOracle,
    query: &str,
    vocabulary: &[String],
) -> Result<String, OracleError> {
    let reply = oracle
        .ask(&get_improvement_prompt(query, vocabulary), &format!("User query: {query}"))
        .await?;

    let improved = reply.trim().trim_matches('"').trim();
    if improved.is_empty() {
        warn!("query rewrite came back empty, keeping the original query");
        return Ok(query.to_string());
    }
    debug!(original = query, improved, "query rewritten");
    Ok(improved.to_string())
}
