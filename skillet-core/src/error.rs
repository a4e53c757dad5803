use thiserror::Error;

use crate::llm::LlmError;

/// Failure talking to the durable plan/recipe store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage backend failed: {0}")]
    Backend(String),

    #[error("stored record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by plan and grocery operations.
///
/// All of these are recoverable at the caller: preconditions are checked
/// before any mutation, so a rejected operation leaves the plan untouched.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan is not finalized; finalize it before generating a grocery list")]
    NotFinalized,

    #[error("plan has no meals")]
    EmptyPlan,

    #[error("plan is finalized; reset it before editing")]
    AlreadyFinalized,

    #[error("no recipes available from any source")]
    NoRecipesFound,

    #[error("could not parse AI fallback response: {0}")]
    AiFallbackParse(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("AI provider failed: {0}")]
    Llm(#[from] LlmError),
}
