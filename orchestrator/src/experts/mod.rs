// orchestrator/src/experts/mod.rs

pub mod column_selector;
pub mod constraint_builder;
pub mod query_improver;
pub mod restriction;
pub mod synthesizers;
pub mod validity;
