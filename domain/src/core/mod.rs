//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: a labeled benchmark question
//! - [`response::ModelResponse`]: raw provider output for one question
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: display helpers

pub mod error;
pub mod question;
pub mod response;
pub mod string;
