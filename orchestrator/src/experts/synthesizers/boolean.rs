// orchestrator/src/experts/synthesizers/boolean.rs

use search_core::{Constraint, TextOracle};

use super::{is_removal, oracle_failed, SynthesisError};

pub const SYSTEM_PROMPT: &str = "You are a column filter for hotel data.
Respond **only** with:
  • 1   – if the column must be 1 (True)
  • 0   – if the column must be 0 (False)
  • REMOVE_CONSTRAINT – if this column is irrelevant to the query
No other words, spaces or explanations.";

pub fn get_boolean_prompt(column: &str, query: &str) -> String {
    format!(
        "Column: {column}\nUser query: {query}\nIf the column is relevant return the appropriate boolean value."
    )
}

/// `1`/`0` (any integer, non-zero meaning true) or the removal sentinel.
pub fn parse_boolean_reply(column: &str, reply: &str) -> Result<Option<Constraint>, SynthesisError> {
    if is_removal(reply) {
        return Ok(None);
    }
    reply
        .trim()
        .parse::<i64>()
        .map(|flag| Some(Constraint::boolean(column, flag != 0)))
        .map_err(|_| SynthesisError::malformed(column, reply))
}

pub async fn synthesize(
    oracle: &dyn TextOracle,
    column: &str,
    query: &str,
) -> Result<Option<Constraint>, SynthesisError> {
    let reply = oracle
        .ask(SYSTEM_PROMPT, &get_boolean_prompt(column, query))
        .await
        .map_err(oracle_failed(column))?;
    parse_boolean_reply(column, &reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedOracle;

    #[test]
    fn parses_flags_and_sentinel() {
        assert_eq!(
            parse_boolean_reply("Sauna", "1").unwrap(),
            Some(Constraint::boolean("Sauna", true))
        );
        assert_eq!(
            parse_boolean_reply("Sauna", " 0\n").unwrap(),
            Some(Constraint::boolean("Sauna", false))
        );
        assert_eq!(parse_boolean_reply("Sauna", "REMOVE_CONSTRAINT").unwrap(), None);
    }

    #[test]
    fn chatter_is_malformed() {
        let err = parse_boolean_reply("Sauna", "Yes, a sauna is needed").unwrap_err();
        assert!(matches!(err, SynthesisError::Malformed { .. }));
    }

    #[tokio::test]
    async fn asks_about_the_column() {
        let oracle = ScriptedOracle::new().reply("column filter", "Column: Pool\n", "1");
        let constraint = synthesize(&oracle, "Pool", "hotel with a pool").await.unwrap();
        assert_eq!(constraint, Some(Constraint::boolean("Pool", true)));
        let calls = oracle.calls();
        assert!(calls[0].1.contains("User query: hotel with a pool"));
    }

    #[tokio::test]
    async fn oracle_failure_is_reported() {
        let oracle = ScriptedOracle::new().fail("column filter", "Pool");
        let err = synthesize(&oracle, "Pool", "pool").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Oracle { .. }));
    }
}
