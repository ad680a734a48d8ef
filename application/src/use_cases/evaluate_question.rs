//! Evaluate Question use case
//!
//! One question, end to end: obtain the primary response, run every
//! detector on it and combine their outcomes into an ensemble verdict.

use super::self_consistency::SelfConsistencyChecker;
use super::shared::ProviderCaller;
use crate::config::EvaluationParams;
use crate::ports::evaluation_logger::{EvaluationEvent, EvaluationLogger, NoEvaluationLogger};
use crate::ports::llm_provider::{GenerationRequest, LlmProvider};
use crate::resilience::{CallOutcome, RateLimiter};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use veracity_domain::core::string::preview;
use veracity_domain::detection::{
    ConsistencyScorer, ContradictionDetector, DetectorOutcome, TokenOverlapVerifier,
};
use veracity_domain::{EnsembleCombiner, EnsembleVerdict, EvaluationRecord, ModelResponse, Question};

/// Use case for evaluating a single question
pub struct EvaluateQuestionUseCase {
    caller: ProviderCaller,
    temperature: f64,
    max_tokens: u32,
    verifier: TokenOverlapVerifier,
    consistency: SelfConsistencyChecker,
    contradiction: ContradictionDetector,
    combiner: EnsembleCombiner,
    logger: Arc<dyn EvaluationLogger>,
}

impl EvaluateQuestionUseCase {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        limiter: Arc<RateLimiter>,
        params: &EvaluationParams,
    ) -> Self {
        let caller =
            ProviderCaller::new(provider, limiter, params.retry.clone(), params.call_timeout);
        let detection = &params.detection;
        let consistency = SelfConsistencyChecker::new(
            caller.clone(),
            ConsistencyScorer::new(detection.similarity_threshold),
            detection.consistency_samples,
            detection.sampling_temperature,
            params.sample_max_tokens,
        );
        Self {
            caller,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            verifier: TokenOverlapVerifier::new(detection.overlap_threshold),
            consistency,
            contradiction: ContradictionDetector::new(),
            combiner: EnsembleCombiner::new(),
            logger: Arc::new(NoEvaluationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn EvaluationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.caller.provider_name()
    }

    /// Evaluate `question`. Never fails: provider trouble ends up in the
    /// record's status and errors.
    pub async fn execute(&self, question: &Question) -> EvaluationRecord {
        let request = GenerationRequest::new(question.text(), self.temperature, self.max_tokens);
        let generation = match self.caller.call(&request).await {
            CallOutcome::Success(generation) => generation,
            failed => {
                let error = failed
                    .describe_failure()
                    .unwrap_or_else(|| "unknown provider failure".to_string());
                warn!("Question {} failed: {}", question.id(), error);
                self.logger.log(EvaluationEvent::new(
                    "provider_failure",
                    json!({
                        "model": self.provider_name(),
                        "question_id": question.id(),
                        "error": error,
                    }),
                ));
                return EvaluationRecord::failed(question.clone(), error);
            }
        };

        let response = ModelResponse::from(generation);
        self.logger.log(EvaluationEvent::new(
            "response",
            json!({
                "model": self.provider_name(),
                "question_id": question.id(),
                "text": response.text,
                "latency_ms": response.latency_ms,
                "token_count": response.token_count,
            }),
        ));

        let sampling = self.consistency.check(question, &response.text).await;
        for error in &sampling.errors {
            self.logger.log(EvaluationEvent::new(
                "provider_failure",
                json!({
                    "model": self.provider_name(),
                    "question_id": question.id(),
                    "error": error,
                }),
            ));
        }

        let verdict = self.score(question, &response.text, sampling.outcome);
        debug!(
            "Question {}: {} ({:.2}) for \"{}\"",
            question.id(),
            verdict.label,
            verdict.confidence,
            preview(&response.text, 60)
        );
        self.logger.log(EvaluationEvent::new(
            "verdict",
            json!({
                "model": self.provider_name(),
                "question_id": question.id(),
                "verdict": verdict,
            }),
        ));

        EvaluationRecord::scored(question.clone(), response, verdict).with_errors(sampling.errors)
    }

    /// Run the provider-free detectors and combine them with an already
    /// obtained consistency outcome.
    pub fn score(
        &self,
        question: &Question,
        response: &str,
        consistency: DetectorOutcome,
    ) -> EnsembleVerdict {
        let overlap = self.verifier.verify(response, question.expected_answer());
        let contradiction =
            self.contradiction
                .detect(question.text(), question.expected_answer(), response);
        self.combiner.combine(vec![
            DetectorOutcome::voted(overlap),
            consistency,
            DetectorOutcome::voted(contradiction),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::super::shared::test_support::*;
    use super::*;
    use crate::ports::llm_provider::ProviderError;
    use crate::resilience::{RateLimitConfig, RetryPolicy};
    use std::sync::Mutex;
    use std::time::Duration;
    use veracity_domain::detection::DetectorKind;
    use veracity_domain::{DetectionConfig, EvaluationStatus, HallucinationKind, Label};

    fn params() -> EvaluationParams {
        EvaluationParams::default()
            .with_retry(RetryPolicy::default().with_initial_backoff(Duration::from_millis(1)))
            .with_rate_limit(RateLimitConfig {
                requests_per_minute: 0,
                burst: 1,
            })
    }

    fn use_case(
        provider: Arc<ScriptedProvider>,
        params: &EvaluationParams,
    ) -> EvaluateQuestionUseCase {
        EvaluateQuestionUseCase::new(provider, Arc::new(RateLimiter::unlimited()), params)
    }

    struct CapturingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl EvaluationLogger for CapturingLogger {
        fn log(&self, event: EvaluationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_correct_answer_end_to_end() {
        let question = Question::new("geo-1", "What is the capital of France?", "Paris").unwrap();
        let provider = Arc::new(ScriptedProvider::new().script(
            "What is the capital of France?",
            vec![text("Paris."), text("Paris"), text("Paris"), text("The capital is Paris.")],
        ));
        let logger = Arc::new(CapturingLogger {
            events: Mutex::new(Vec::new()),
        });
        let record = use_case(Arc::clone(&provider), &params())
            .with_logger(logger.clone())
            .execute(&question)
            .await;

        assert_eq!(record.status, EvaluationStatus::Complete);
        let verdict = record.verdict.unwrap();
        assert_eq!(verdict.label, Label::Correct);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.contributions.len(), 3);
        assert_eq!(provider.calls(), 4);
        assert_eq!(*logger.events.lock().unwrap(), vec!["response", "verdict"]);
    }

    #[tokio::test]
    async fn test_primary_uses_response_temperature() {
        let question = Question::new("geo-1", "Capital of Peru?", "Lima").unwrap();
        let provider =
            Arc::new(ScriptedProvider::new().script("Capital of Peru?", vec![text("Lima")]));
        let params = params()
            .with_temperature(0.0)
            .with_detection(DetectionConfig::default().with_samples(0));
        use_case(Arc::clone(&provider), &params).execute(&question).await;
        assert_eq!(provider.temperatures(), vec![0.0]);
    }

    #[tokio::test]
    async fn test_primary_failure_yields_failed_record() {
        let question = Question::new("q", "Unscripted?", "x").unwrap();
        let provider = Arc::new(ScriptedProvider::new());
        let record = use_case(Arc::clone(&provider), &params()).execute(&question).await;
        assert_eq!(record.status, EvaluationStatus::Failed);
        assert!(record.verdict.is_none());
        assert_eq!(record.errors.len(), 1);
        // no sampling after a failed primary call
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_sample_failures_degrade_but_still_score() {
        let question = Question::new("q", "How many moons does Mars have?", "2").unwrap();
        let timeouts = (0..9).map(|_| Scripted::Error(ProviderError::Timeout));
        let mut script = vec![text("Mars has 2 moons.")];
        script.extend(timeouts);
        let provider =
            Arc::new(ScriptedProvider::new().script("How many moons does Mars have?", script));

        let record = use_case(Arc::clone(&provider), &params()).execute(&question).await;
        assert_eq!(record.status, EvaluationStatus::Degraded);
        let verdict = record.verdict.as_ref().unwrap();
        assert_eq!(verdict.label, Label::Correct);
        assert_eq!(verdict.excluded[0].detector(), DetectorKind::SelfConsistency);
        assert_eq!(record.errors.len(), 3);
        // 1 primary + 3 samples x 3 attempts
        assert_eq!(provider.calls(), 10);
    }

    #[tokio::test]
    async fn test_wrong_count_is_hallucination() {
        let question = Question::new("count-1", "How many r's are in strawberry?", "3").unwrap();
        let provider = Arc::new(ScriptedProvider::new().script(
            "How many r's are in strawberry?",
            vec![text("2"), text("4"), text("5"), text("6")],
        ));
        let record = use_case(provider, &params()).execute(&question).await;
        let verdict = record.verdict.unwrap();
        assert_eq!(verdict.label, Label::Hallucination);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
        assert_eq!(verdict.primary_kind, Some(HallucinationKind::NumericalError));
    }
}
