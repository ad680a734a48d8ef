//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod evaluation_logger;
pub mod llm_provider;
pub mod progress;
