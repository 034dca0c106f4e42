// orchestrator/src/experts/column_selector.rs

use search_core::{OracleError, TextOracle};
use tracing::{debug, warn};

pub fn get_column_selection_prompt(vocabulary: &[String]) -> String {
    format!(
        r#"You are a strict extraction assistant for a hotel search system.

Given a user prompt, your job is to select exactly the matching column names from the following list:

{columns}

Important:
- Information about included meals (e.g., breakfast included, all-inclusive) is found in the column named **mealtype**.
- Information about room types (e.g., Deluxe Double Room, Suite) is found in the column named **roomcategory**.

Instructions:
- Only select from the provided column names. Do not invent new ones.
- Only include columns that directly match or are clearly implied by the user prompt.
- Use a **single line**, comma-separated, **no spaces**.
- Do not include any explanations, words, or extra characters.
- If no relevant columns are found, return an **empty string**.

Example Output:
distancetotrainstation,Innenpool,rating
or
'' (empty quotes if no match)"#,
        columns = vocabulary.join(","),
    )
}

/// Splits the selector reply into column names. Replies shorter than three
/// characters (`''`, blanks) mean no column applies. Names outside
/// `vocabulary` are dropped.
pub fn parse_column_list(reply: &str, vocabulary: &[String]) -> Vec<String> {
    if reply.chars().count() < 3 {
        return Vec::new();
    }
    let mut columns: Vec<String> = Vec::new();
    for part in reply.split(',') {
        let name = part.trim().trim_matches(|c: char| matches!(c, '\'' | '"' | '`')).trim();
        if name.is_empty() || columns.iter().any(|c| c == name) {
            continue;
        }
        if !vocabulary.iter().any(|v| v == name) {
            warn!(column = name, "selector returned an unknown column, ignoring it");
            continue;
        }
        columns.push(name.to_string());
    }
    columns
}

/// Relevant attribute names for the (improved) query. An `Err` means the
/// answer is unknown, as opposed to an empty selection.
pub async fn select_relevant_columns(
    oracle: &dyn TextOracle,
    query: &str,
    vocabulary: &[String],
) -> Result<Vec<String>, OracleError> {
    let reply = oracle
        .ask(&get_column_selection_prompt(vocabulary), &format!("User prompt: {query}"))
        .await?;
    let columns = parse_column_list(&reply, vocabulary);
    debug!(?columns, "relevant columns selected");
    Ok(columns)
}
