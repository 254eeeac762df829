//! Recommendation pipeline: prompt construction, generation against the model, validation of
//! its output, and reconciliation of fresh sets with the store.

pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod submission;
pub mod validation;
