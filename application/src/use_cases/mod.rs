//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod evaluate_question;
pub mod run_benchmark;
pub mod self_consistency;
pub(crate) mod shared;
