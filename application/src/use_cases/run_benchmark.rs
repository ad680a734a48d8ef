//! Run Benchmark use case
//!
//! Evaluates a whole corpus against one provider with a bounded pool of
//! workers, then aggregates the records into a run summary.

use super::evaluate_question::EvaluateQuestionUseCase;
use crate::config::EvaluationParams;
use crate::ports::evaluation_logger::{EvaluationLogger, NoEvaluationLogger};
use crate::ports::llm_provider::LlmProvider;
use crate::ports::progress::{EvaluationProgress, NoProgress};
use crate::resilience::RateLimiter;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};
use veracity_domain::{DomainError, EvaluationRecord, Question, ResultAggregator, RunSummary};

/// Errors that stop a run before any question is evaluated
#[derive(Error, Debug)]
pub enum RunBenchmarkError {
    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error("Invalid detection config: {0}")]
    InvalidConfig(#[from] DomainError),
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// Provider display name
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One record per question, in corpus order
    pub records: Vec<EvaluationRecord>,
    pub summary: RunSummary,
}

/// Use case for running a benchmark
pub struct RunBenchmarkUseCase {
    provider: Arc<dyn LlmProvider>,
    params: EvaluationParams,
    logger: Arc<dyn EvaluationLogger>,
}

impl RunBenchmarkUseCase {
    pub fn new(provider: Arc<dyn LlmProvider>, params: EvaluationParams) -> Self {
        Self {
            provider,
            params,
            logger: Arc::new(NoEvaluationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn EvaluationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        questions: Vec<Question>,
    ) -> Result<BenchmarkRun, RunBenchmarkError> {
        self.execute_with_progress(questions, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        questions: Vec<Question>,
        progress: &dyn EvaluationProgress,
    ) -> Result<BenchmarkRun, RunBenchmarkError> {
        if questions.is_empty() {
            return Err(RunBenchmarkError::EmptyCorpus);
        }
        self.params.detection.validate()?;

        let model = self.provider.name().to_string();
        let workers = self.params.concurrency.max(1);
        info!(
            "Starting benchmark of {} on {} questions with {} workers",
            model,
            questions.len(),
            workers
        );

        let started_at = Utc::now();
        progress.on_run_start(&model, questions.len());

        // One limiter per run, shared by every worker and every sample
        let limiter = Arc::new(RateLimiter::new(self.params.rate_limit));
        let evaluator = Arc::new(
            EvaluateQuestionUseCase::new(Arc::clone(&self.provider), limiter, &self.params)
                .with_logger(Arc::clone(&self.logger)),
        );

        let mut join_set = JoinSet::new();
        let mut pending = questions.iter().cloned().enumerate();
        let mut slots: Vec<Option<EvaluationRecord>> = vec![None; questions.len()];
        let mut aggregator = ResultAggregator::new();

        let spawn_next = |join_set: &mut JoinSet<(usize, EvaluationRecord)>,
                          pending: &mut dyn Iterator<Item = (usize, Question)>| {
            if let Some((index, question)) = pending.next() {
                let evaluator = Arc::clone(&evaluator);
                join_set.spawn(async move {
                    let record = evaluator.execute(&question).await;
                    (index, record)
                });
            }
        };

        for _ in 0..workers {
            spawn_next(&mut join_set, &mut pending);
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, record)) => {
                    // Single writer: each record is applied whole, in completion order
                    aggregator.add_record(&record);
                    progress.on_question_complete(&record);
                    slots[index] = Some(record);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
            spawn_next(&mut join_set, &mut pending);
        }

        // A task that died without reporting leaves its slot empty
        let records: Vec<EvaluationRecord> = slots
            .into_iter()
            .zip(questions)
            .map(|(slot, question)| {
                slot.unwrap_or_else(|| {
                    let record = EvaluationRecord::failed(question, "evaluation task aborted");
                    aggregator.add_record(&record);
                    progress.on_question_complete(&record);
                    record
                })
            })
            .collect();
        let summary = aggregator.finalize();
        let finished_at = Utc::now();

        info!(
            "Benchmark of {} finished: {} evaluated, {} failed, {} degraded",
            model, summary.evaluated, summary.failures, summary.degraded
        );
        progress.on_run_complete(&model, &summary);

        Ok(BenchmarkRun {
            model,
            started_at,
            finished_at,
            records,
            summary,
        })
    }
}
