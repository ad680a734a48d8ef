//! Application layer for veracity
//!
//! This crate contains use cases, port definitions, provider-call resilience
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod resilience;
pub mod use_cases;

// Re-export commonly used types
pub use config::EvaluationParams;
pub use ports::{
    evaluation_logger::{EvaluationEvent, EvaluationLogger, NoEvaluationLogger},
    llm_provider::{Generation, GenerationRequest, LlmProvider, ProviderError},
    progress::{EvaluationProgress, NoProgress},
};
pub use resilience::{CallOutcome, RateLimitConfig, RateLimiter, RetryPolicy};
pub use use_cases::evaluate_question::EvaluateQuestionUseCase;
pub use use_cases::run_benchmark::{BenchmarkRun, RunBenchmarkError, RunBenchmarkUseCase};
pub use use_cases::self_consistency::{SamplingResult, SelfConsistencyChecker};
