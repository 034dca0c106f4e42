// search_core/src/lib.rs

pub mod catalog;
pub mod constraint;
pub mod error;
pub mod scoring;

use async_trait::async_trait;

pub use catalog::{AttributeKind, AttributeValue, Catalog, Hotel, LTR_SCORE_ATTRIBUTE};
pub use constraint::{
    virtual_aggregate, ComparisonOperator, Constraint, ConstraintKind, UnknownOperator,
    MASSAGE_COLUMNS, POOL_COLUMNS,
};
pub use error::OracleError;
pub use scoring::{rank_by_ltr_only, rank_by_score, score, Scores};

/// Attribute whose constraint is always a numeric comparison, whatever
/// the column type in the catalog.
pub const STAR_RATING_ATTRIBUTE: &str = "starcategory";

/// Single-shot access to the text-generation model. Every classifier and
/// synthesizer is built on this one call.
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError>;
}
