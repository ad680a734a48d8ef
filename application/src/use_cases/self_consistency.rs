//! Self-consistency sampling
//!
//! Re-asks the provider the same question several times and scores how well
//! the answers agree with the original response. Samples are requested
//! concurrently; each one goes through the shared rate limiter.

use super::shared::ProviderCaller;
use crate::ports::llm_provider::GenerationRequest;
use crate::resilience::CallOutcome;
use futures::future::join_all;
use tracing::{debug, warn};
use veracity_domain::Question;
use veracity_domain::detection::{ConsistencyScorer, DetectorKind, DetectorOutcome};

/// Result of one sampling round
#[derive(Debug, Clone)]
pub struct SamplingResult {
    pub outcome: DetectorOutcome,
    /// Failed sample calls, described
    pub errors: Vec<String>,
}

/// Samples extra responses and turns them into a consistency verdict
pub struct SelfConsistencyChecker {
    caller: ProviderCaller,
    scorer: ConsistencyScorer,
    samples: usize,
    temperature: f64,
    max_tokens: u32,
}

impl SelfConsistencyChecker {
    pub(crate) fn new(
        caller: ProviderCaller,
        scorer: ConsistencyScorer,
        samples: usize,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            caller,
            scorer,
            samples,
            temperature,
            max_tokens,
        }
    }

    /// Sample `question` and score the samples against `original`.
    ///
    /// Zero configured samples skips the detector. When every sample fails
    /// the detector is unavailable and must not vote.
    pub async fn check(&self, question: &Question, original: &str) -> SamplingResult {
        if self.samples == 0 {
            return SamplingResult {
                outcome: DetectorOutcome::Skipped {
                    detector: DetectorKind::SelfConsistency,
                },
                errors: Vec::new(),
            };
        }

        let request = GenerationRequest::new(question.text(), self.temperature, self.max_tokens);
        let outcomes = join_all((0..self.samples).map(|_| self.caller.call(&request))).await;

        let mut texts = Vec::with_capacity(self.samples);
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                CallOutcome::Success(generation) => texts.push(generation.text),
                failed => {
                    if let Some(description) = failed.describe_failure() {
                        errors.push(format!("sample: {}", description));
                    }
                }
            }
        }

        debug!(
            "Question {}: {}/{} samples obtained from {}",
            question.id(),
            texts.len(),
            self.samples,
            self.caller.provider_name()
        );

        let outcome = match self.scorer.score(original, &texts, self.samples, errors.len()) {
            Some(verdict) => DetectorOutcome::voted(verdict),
            None => {
                warn!(
                    "Question {}: all {} consistency samples failed",
                    question.id(),
                    self.samples
                );
                DetectorOutcome::unavailable(
                    DetectorKind::SelfConsistency,
                    format!("all {} samples failed", self.samples),
                )
            }
        };

        SamplingResult { outcome, errors }
    }
}
