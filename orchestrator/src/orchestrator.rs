// orchestrator/src/orchestrator.rs

use std::sync::Arc;

use common_utils::RestrictionFailurePolicy;
use hotel_catalog::CategoryLookup;
use search_core::{rank_by_ltr_only, rank_by_score, score, Catalog, OracleError, TextOracle};
use thiserror::Error;
use tracing::{info, warn};

use crate::experts::column_selector::select_relevant_columns;
use crate::experts::constraint_builder::build_constraints;
use crate::experts::query_improver::improve_query;
use crate::experts::restriction::{is_unrestricted_request, ClassificationError};
use crate::experts::validity::is_valid_request;

/// Number of hotels returned per search.
pub const RESULT_LIMIT: usize = 10;

/// Terminal state of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query is not a hotel search.
    Rejected,
    /// No concrete filter; the catalog ranked by `ltr_score`.
    Unrestricted(Vec<String>),
    /// Filters were stated but none map to a known attribute.
    NoRelevantColumns,
    /// Hotels ranked by satisfied constraints. May be empty.
    Filtered(Vec<String>),
}

impl SearchOutcome {
    pub fn hotel_ids(&self) -> &[String] {
        match self {
            SearchOutcome::Unrestricted(ids) | SearchOutcome::Filtered(ids) => ids,
            SearchOutcome::Rejected | SearchOutcome::NoRelevantColumns => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Restriction(#[from] ClassificationError),

    #[error("query rewrite failed")]
    QueryImprovement(#[source] OracleError),

    #[error("column selection failed")]
    ColumnSelection(#[source] OracleError),
}

/// Runs the classify → select → build → score → rank pipeline against an
/// injected oracle.
pub struct Orchestrator {
    oracle: Arc<dyn TextOracle>,
    vocabulary: Vec<String>,
    restriction_policy: RestrictionFailurePolicy,
}

impl Orchestrator {
    pub fn new(oracle: Arc<dyn TextOracle>, categories: &CategoryLookup) -> Self {
        let vocabulary = categories.attribute_universe();
        info!(attributes = vocabulary.len(), "orchestrator initialized");
        Self {
            oracle,
            vocabulary,
            restriction_policy: RestrictionFailurePolicy::default(),
        }
    }

    pub fn with_restriction_policy(mut self, policy: RestrictionFailurePolicy) -> Self {
        self.restriction_policy = policy;
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub async fn find_matching_hotels(
        &self,
        query: &str,
        catalog: &Catalog,
    ) -> Result<SearchOutcome, PipelineError> {
        let oracle = self.oracle.as_ref();

        // all three always run; later branches discard what they don't need
        let (improved, is_valid, unrestricted) = tokio::join!(
            improve_query(oracle, query, &self.vocabulary),
            is_valid_request(oracle, query),
            is_unrestricted_request(oracle, query),
        );

        if !is_valid {
            info!(query, "query rejected");
            return Ok(SearchOutcome::Rejected);
        }

        let unrestricted = match (unrestricted, self.restriction_policy) {
            (Ok(flag), _) => flag,
            (Err(e), RestrictionFailurePolicy::FailOpen) => {
                warn!(error = %e, "restriction unknown, ranking whole catalog");
                true
            }
            (Err(e), RestrictionFailurePolicy::FailClosed) => return Err(e.into()),
        };

        if unrestricted {
            let ranked: Vec<String> = rank_by_ltr_only(catalog).into_iter().take(RESULT_LIMIT).collect();
            info!(hotels = ranked.len(), "unrestricted query, ranked by ltr_score");
            return Ok(SearchOutcome::Unrestricted(ranked));
        }

        let improved = improved.map_err(PipelineError::QueryImprovement)?;
        let columns = select_relevant_columns(oracle, &improved, &self.vocabulary)
            .await
            .map_err(PipelineError::ColumnSelection)?;
        if columns.is_empty() {
            info!(improved = %improved, "no relevant columns");
            return Ok(SearchOutcome::NoRelevantColumns);
        }

        let constraints = build_constraints(oracle, catalog, &improved, &columns).await;
        let scores = score(&constraints, catalog);
        let ranked: Vec<String> = rank_by_score(&scores, catalog)
            .into_iter()
            .take(RESULT_LIMIT)
            .collect();
        info!(
            columns = columns.len(),
            constraints = constraints.len(),
            scored = scores.len(),
            returned = ranked.len(),
            "filtered search finished"
        );
        Ok(SearchOutcome::Filtered(ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedOracle;
    use search_core::{AttributeValue, Hotel, LTR_SCORE_ATTRIBUTE};

    const VALIDATOR: &str = "hotel search request validator";
    const RESTRICTION: &str = "hotel-query classifier";
    const IMPROVER: &str = "improves hotel search queries";
    const SELECTOR: &str = "strict extraction assistant";

    fn hotel(id: &str, ltr: f64, attrs: &[(&str, AttributeValue)]) -> Hotel {
        let mut attributes: Vec<(String, AttributeValue)> =
            attrs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        attributes.push((LTR_SCORE_ATTRIBUTE.to_string(), AttributeValue::Number(ltr)));
        Hotel::new(id, attributes)
    }

    fn three_hotels() -> Catalog {
        vec![hotel("A", 5.0, &[]), hotel("B", 9.0, &[]), hotel("C", 1.0, &[])]
            .into_iter()
            .collect()
    }

    fn categories() -> CategoryLookup {
        CategoryLookup::from_json_str(
            r#"{"wellness_spa": ["Sauna", "Massage"], "price_rating": ["pricepernight", "starcategory"]}"#,
        )
        .unwrap()
    }

    fn orchestrator(oracle: Arc<ScriptedOracle>) -> Orchestrator {
        Orchestrator::new(oracle, &categories())
    }

    #[tokio::test]
    async fn unrestricted_query_ranks_by_ltr() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "UNRESTRICTED")
                .reply(IMPROVER, "", "I would like to see hotels."),
        );
        let outcome = orchestrator(oracle.clone())
            .find_matching_hotels("Show me hotels", &three_hotels())
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Unrestricted(vec!["B".into(), "A".into(), "C".into()]));
        assert_eq!(oracle.call_count(VALIDATOR), 1);
        assert_eq!(oracle.call_count(RESTRICTION), 1);
        assert_eq!(oracle.call_count(IMPROVER), 1);
        assert_eq!(oracle.call_count(SELECTOR), 0);
    }

    #[tokio::test]
    async fn invalid_query_is_rejected_whatever_the_catalog() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "invalid")
                .reply(RESTRICTION, "", "UNRESTRICTED")
                .reply(IMPROVER, "", "What is the capital of France?"),
        );
        let orchestrator = orchestrator(oracle);
        for catalog in [three_hotels(), Catalog::new()] {
            let outcome = orchestrator
                .find_matching_hotels("What's the capital of France?", &catalog)
                .await
                .unwrap();
            assert_eq!(outcome, SearchOutcome::Rejected);
        }
    }

    #[tokio::test]
    async fn restricted_query_without_columns_is_not_a_rejection() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "RESTRICTED")
                .reply(IMPROVER, "", "A hotel with a helipad.")
                .reply(SELECTOR, "", "''"),
        );
        let outcome = orchestrator(oracle)
            .find_matching_hotels("hotel with a helipad", &three_hotels())
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::NoRelevantColumns);
        assert_ne!(outcome, SearchOutcome::Rejected);
        assert!(outcome.hotel_ids().is_empty());
    }

    #[tokio::test]
    async fn restricted_query_scores_and_ranks() {
        let catalog: Catalog = vec![
            hotel(
                "Cheap Sauna",
                1.0,
                &[
                    ("Sauna", AttributeValue::Boolean(true)),
                    ("pricepernight", AttributeValue::Number(80.0)),
                ],
            ),
            hotel(
                "Pricey Sauna",
                9.0,
                &[
                    ("Sauna", AttributeValue::Boolean(true)),
                    ("pricepernight", AttributeValue::Number(150.0)),
                ],
            ),
            hotel(
                "Neither",
                10.0,
                &[
                    ("Sauna", AttributeValue::Boolean(false)),
                    ("pricepernight", AttributeValue::Number(300.0)),
                ],
            ),
        ]
        .into_iter()
        .collect();

        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "RESTRICTED")
                .reply(IMPROVER, "", "A hotel with a Sauna under 100 euros per night.")
                .reply(SELECTOR, "Sauna under 100", "Sauna,pricepernight")
                .reply("Respond **only** with", "Column: Sauna\n", "1")
                .reply("<operator>,<number>", "Column: pricepernight\n", "<=,100"),
        );
        let outcome = orchestrator(oracle.clone())
            .find_matching_hotels("sauna, max 100€", &catalog)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::Filtered(vec!["Cheap Sauna".into(), "Pricey Sauna".into()])
        );
        // synthesizers see the rewritten query, not the raw one
        assert!(oracle
            .calls()
            .iter()
            .filter(|(_, user)| user.starts_with("Column:"))
            .all(|(_, user)| user.contains("under 100 euros")));
    }

    #[tokio::test]
    async fn constraints_matching_nothing_yield_empty_filtered_list() {
        let catalog: Catalog = vec![
            hotel("Sol", 4.0, &[("Sauna", AttributeValue::Boolean(false))]),
            hotel("Mar", 2.0, &[("Sauna", AttributeValue::Boolean(false))]),
        ]
        .into_iter()
        .collect();
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "RESTRICTED")
                .reply(IMPROVER, "", "A hotel with a Sauna.")
                .reply(SELECTOR, "", "Sauna")
                .reply("Respond **only** with", "Column: Sauna\n", "1"),
        );
        let outcome = orchestrator(oracle)
            .find_matching_hotels("sauna please", &catalog)
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Filtered(vec![]));
        assert_ne!(outcome, SearchOutcome::NoRelevantColumns);
    }

    #[tokio::test]
    async fn results_are_capped() {
        let catalog: Catalog = (0..25)
            .map(|i| hotel(&format!("H{i:02}"), f64::from(i), &[]))
            .collect();
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "UNRESTRICTED")
                .reply(IMPROVER, "", "hotels"),
        );
        let outcome = orchestrator(oracle)
            .find_matching_hotels("hotels please", &catalog)
            .await
            .unwrap();
        let ids = outcome.hotel_ids();
        assert_eq!(ids.len(), RESULT_LIMIT);
        assert_eq!(ids[0], "H24");
    }

    #[tokio::test]
    async fn restriction_failure_follows_policy() {
        let script = || {
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .fail(RESTRICTION, "")
                .reply(IMPROVER, "", "hotels")
        };

        let closed = orchestrator(Arc::new(script()));
        let err = closed
            .find_matching_hotels("hotels", &three_hotels())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Restriction(_)));

        let open = orchestrator(Arc::new(script())).with_restriction_policy(RestrictionFailurePolicy::FailOpen);
        let outcome = open.find_matching_hotels("hotels", &three_hotels()).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Unrestricted(vec!["B".into(), "A".into(), "C".into()]));
    }

    #[tokio::test]
    async fn column_selection_outage_is_an_error() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .reply(VALIDATOR, "", "valid")
                .reply(RESTRICTION, "", "RESTRICTED")
                .reply(IMPROVER, "", "A hotel with a sauna.")
                .fail(SELECTOR, ""),
        );
        let err = orchestrator(oracle)
            .find_matching_hotels("sauna", &three_hotels())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ColumnSelection(_)));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let oracle = Arc::new(ScriptedOracle::new().reply(IMPROVER, "", ""));
        let outcome = orchestrator(oracle.clone())
            .find_matching_hotels("", &three_hotels())
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Rejected);
        assert_eq!(oracle.call_count(VALIDATOR), 0);
    }
}
