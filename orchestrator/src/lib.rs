// orchestrator/src/lib.rs

pub mod experts;
pub mod llm;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use crate::llm::ChatCompletionsOracle;
pub use crate::orchestrator::{Orchestrator, PipelineError, SearchOutcome, RESULT_LIMIT};
