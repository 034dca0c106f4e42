// orchestrator/src/experts/constraint_builder.rs

use std::collections::BTreeSet;

use futures_util::future::join_all;
use search_core::{
    virtual_aggregate, AttributeKind, Catalog, Constraint, TextOracle, STAR_RATING_ATTRIBUTE,
};
use tracing::{debug, warn};

use super::synthesizers::{boolean, categorical, comparison, SynthesisError};

/// Which synthesizer handles an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisPlan {
    Boolean,
    Comparison,
    Categorical(BTreeSet<String>),
    Skip,
}

/// Virtual aggregates and the star rating are fixed; everything else
/// follows the column type recorded in the catalog.
pub fn plan_for(catalog: &Catalog, attribute: &str) -> SynthesisPlan {
    if virtual_aggregate(attribute).is_some() {
        return SynthesisPlan::Boolean;
    }
    if attribute == STAR_RATING_ATTRIBUTE {
        return SynthesisPlan::Comparison;
    }
    match catalog.kind_of(attribute) {
        Some(AttributeKind::Boolean) => SynthesisPlan::Boolean,
        Some(AttributeKind::Number) => SynthesisPlan::Comparison,
        Some(AttributeKind::Text) => {
            let values = catalog.distinct_text_values(attribute);
            if values.is_empty() {
                SynthesisPlan::Skip
            } else {
                SynthesisPlan::Categorical(values)
            }
        }
        Some(AttributeKind::Null) | None => SynthesisPlan::Skip,
    }
}

async fn synthesize_one(
    oracle: &dyn TextOracle,
    attribute: &str,
    query: &str,
    plan: SynthesisPlan,
) -> Result<Option<Constraint>, SynthesisError> {
    match plan {
        SynthesisPlan::Boolean => boolean::synthesize(oracle, attribute, query).await,
        SynthesisPlan::Comparison => comparison::synthesize(oracle, attribute, query).await,
        SynthesisPlan::Categorical(values) => {
            categorical::synthesize(oracle, attribute, query, &values).await
        }
        SynthesisPlan::Skip => Ok(None),
    }
}

/// One constraint per relevant attribute that the oracle can pin down, in
/// the order the attributes were given. Synthesis runs concurrently;
/// failures only shorten the list.
pub async fn build_constraints(
    oracle: &dyn TextOracle,
    catalog: &Catalog,
    query: &str,
    attributes: &[String],
) -> Vec<Constraint> {
    let tasks = attributes.iter().map(|attribute| {
        let plan = plan_for(catalog, attribute);
        debug!(attribute = %attribute, ?plan, "planned synthesis");
        synthesize_one(oracle, attribute, query, plan)
    });

    let mut constraints = Vec::with_capacity(attributes.len());
    for (attribute, result) in attributes.iter().zip(join_all(tasks).await) {
        match result {
            Ok(Some(constraint)) => {
                debug!(%constraint, "constraint built");
                constraints.push(constraint);
            }
            Ok(None) => debug!(attribute = %attribute, "no constraint for attribute"),
            Err(e) => warn!(error = %e, "dropping attribute from filtering"),
        }
    }
    constraints
}
