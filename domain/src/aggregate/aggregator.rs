//! Stratified accumulation of verdicts

use super::bucket::{BucketCounts, TriggerGroup};
use super::summary::{KindCount, RunSummary};
use super::trend::{DifficultyTrend, TierRate};
use crate::core::question::{Category, Difficulty, Question};
use crate::core::response::ModelResponse;
use crate::detection::HallucinationKind;
use crate::ensemble::EnsembleVerdict;
use crate::evaluation::{EvaluationRecord, EvaluationStatus};
use std::collections::BTreeMap;

/// Collects verdicts into category, difficulty and trigger buckets
///
/// One verdict updates each stratification independently. The aggregator
/// is a plain value; callers running evaluations concurrently wrap it in a
/// lock so each verdict is applied whole.
///
/// # Example
///
/// ```
/// use veracity_domain::aggregate::ResultAggregator;
///
/// let summary = ResultAggregator::new().finalize();
/// assert_eq!(summary.total_questions, 0);
/// assert_eq!(summary.by_difficulty.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    overall: BucketCounts,
    by_category: BTreeMap<Category, BucketCounts>,
    by_difficulty: BTreeMap<Difficulty, BucketCounts>,
    by_trigger: BTreeMap<TriggerGroup, BucketCounts>,
    kinds: BTreeMap<HallucinationKind, u64>,
    failures: u64,
    degraded: u64,
    provider_errors: u64,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the buckets from stored records.
    ///
    /// Stored verdicts are taken as they are; nothing is re-scored.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EvaluationRecord>) -> Self {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.add_record(record);
        }
        aggregator
    }

    pub fn add(
        &mut self,
        question: &Question,
        response: &ModelResponse,
        verdict: &EnsembleVerdict,
    ) {
        let label = verdict.label;
        let (latency, tokens) = (response.latency_ms, response.token_count);

        self.overall.add(label, latency, tokens);
        self.by_category
            .entry(question.category())
            .or_default()
            .add(label, latency, tokens);
        self.by_difficulty
            .entry(question.difficulty())
            .or_default()
            .add(label, latency, tokens);
        self.by_trigger
            .entry(TriggerGroup::of(question.is_trigger()))
            .or_default()
            .add(label, latency, tokens);

        if let Some(kind) = verdict.primary_kind {
            *self.kinds.entry(kind).or_insert(0) += 1;
        }
    }

    /// Failed records count toward the failure total only. Every recorded
    /// provider error counts, whether or not the question was scored.
    pub fn add_record(&mut self, record: &EvaluationRecord) {
        self.record_provider_errors(record.errors.len() as u64);
        match record.scored_verdict() {
            Some((response, verdict)) => {
                self.add(&record.question, response, verdict);
                if record.status == EvaluationStatus::Degraded {
                    self.degraded += 1;
                }
            }
            None => self.record_failure(),
        }
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_provider_errors(&mut self, count: u64) {
        self.provider_errors += count;
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Snapshot the buckets as rates; an empty aggregator yields empty buckets.
    pub fn finalize(&self) -> RunSummary {
        let empty = BucketCounts::default();
        let tier = |d: Difficulty| self.by_difficulty.get(&d).unwrap_or(&empty);

        let by_difficulty = Difficulty::ORDERED
            .iter()
            .map(|d| tier(*d).finalize(d.as_str()))
            .collect();

        let difficulty_trend = DifficultyTrend::check(Difficulty::ORDERED.iter().map(|d| {
            let bucket = tier(*d);
            TierRate {
                difficulty: *d,
                total: bucket.total,
                hallucination_rate: bucket.hallucination_rate(),
            }
        }));

        let by_trigger = [TriggerGroup::Trigger, TriggerGroup::Standard]
            .iter()
            .map(|g| self.by_trigger.get(g).unwrap_or(&empty).finalize(g.as_str()))
            .collect();

        RunSummary {
            total_questions: self.overall.total + self.failures,
            evaluated: self.overall.total,
            failures: self.failures,
            degraded: self.degraded,
            provider_errors: self.provider_errors,
            overall: self.overall.finalize("overall"),
            by_category: self
                .by_category
                .iter()
                .map(|(c, bucket)| bucket.finalize(c.as_str()))
                .collect(),
            by_difficulty,
            by_trigger,
            difficulty_trend,
            hallucination_kinds: self
                .kinds
                .iter()
                .map(|(kind, count)| KindCount {
                    kind: *kind,
                    count: *count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TrendStatus;
    use crate::detection::{DetectionVerdict, DetectorKind, DetectorOutcome, Label};
    use crate::ensemble::EnsembleCombiner;

    fn verdict(label: Label) -> EnsembleVerdict {
        let vote = match label {
            Label::Correct => DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0),
            Label::Hallucination => DetectionVerdict::hallucination(
                DetectorKind::TokenOverlap,
                1.0,
                HallucinationKind::Fabrication,
            ),
            Label::Uncertain => DetectionVerdict::uncertain(DetectorKind::TokenOverlap, 1.0),
        };
        EnsembleCombiner::new().combine(vec![DetectorOutcome::voted(vote)])
    }

    fn question(id: &str, category: Category, difficulty: Difficulty) -> Question {
        Question::new(id, "q?", "a")
            .unwrap()
            .with_category(category)
            .with_difficulty(difficulty)
    }

    fn feed(agg: &mut ResultAggregator, difficulty: Difficulty, hallucinated: usize, total: usize) {
        let response = ModelResponse::new("x", 10.0, 1);
        for i in 0..total {
            let q = question(&format!("{}-{}", difficulty, i), Category::General, difficulty);
            let label = if i < hallucinated {
                Label::Hallucination
            } else {
                Label::Correct
            };
            agg.add(&q, &response, &verdict(label));
        }
    }

    #[test]
    fn test_verdict_updates_category_and_difficulty_independently() {
        let mut agg = ResultAggregator::new();
        let response = ModelResponse::new("x", 100.0, 5);
        agg.add(
            &question("a", Category::Geography, Difficulty::Easy),
            &response,
            &verdict(Label::Correct),
        );
        agg.add(
            &question("b", Category::Geography, Difficulty::Hard),
            &response,
            &verdict(Label::Hallucination),
        );
        agg.add(
            &question("c", Category::Counting, Difficulty::Hard).with_trigger(true),
            &ModelResponse::new("x", 400.0, 7),
            &verdict(Label::Uncertain),
        );

        let summary = agg.finalize();
        let geo = summary.category(Category::Geography).unwrap();
        assert_eq!((geo.total, geo.correct, geo.hallucinated), (2, 1, 1));
        let hard = summary.difficulty(Difficulty::Hard).unwrap();
        assert_eq!((hard.total, hard.hallucinated, hard.uncertain), (2, 1, 1));
        assert_eq!(hard.mean_latency_ms, 250.0);
        assert_eq!(hard.mean_tokens, 6.0);
        assert_eq!(summary.trigger("trigger").unwrap().total, 1);
        assert_eq!(summary.trigger("standard").unwrap().total, 2);
        assert_eq!(summary.kind_count(HallucinationKind::Fabrication), 1);
        assert!(summary.category(Category::History).is_none());
    }

    #[test]
    fn test_finalize_with_no_verdicts() {
        let summary = ResultAggregator::new().finalize();
        assert_eq!(summary.evaluated, 0);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_difficulty.iter().all(|b| b.total == 0));
        assert_eq!(summary.difficulty_trend.status, TrendStatus::InsufficientData);
    }

    #[test]
    fn test_monotonic_difficulty_rates_satisfied() {
        // 2.5%, 12.7%, 48.6%
        let mut agg = ResultAggregator::new();
        feed(&mut agg, Difficulty::Easy, 1, 40);
        feed(&mut agg, Difficulty::Medium, 127, 1000);
        feed(&mut agg, Difficulty::Hard, 486, 1000);

        let summary = agg.finalize();
        let easy = summary.difficulty(Difficulty::Easy).unwrap();
        assert!((easy.hallucination_rate - 0.025).abs() < 1e-9);
        assert_eq!(summary.difficulty_trend.status, TrendStatus::Satisfied);
        assert!(summary.difficulty_trend.violations.is_empty());
    }

    #[test]
    fn test_non_monotonic_difficulty_rates_violated() {
        // 10%, 5%, 20%
        let mut agg = ResultAggregator::new();
        feed(&mut agg, Difficulty::Easy, 1, 10);
        feed(&mut agg, Difficulty::Medium, 1, 20);
        feed(&mut agg, Difficulty::Hard, 2, 10);

        let trend = agg.finalize().difficulty_trend;
        assert_eq!(trend.status, TrendStatus::Violated);
        assert_eq!(trend.violations.len(), 1);
        assert_eq!(trend.violations[0].from, Difficulty::Easy);
        assert_eq!(trend.violations[0].to, Difficulty::Medium);
    }

    #[test]
    fn test_from_records_matches_incremental() {
        let q1 = question("a", Category::Science, Difficulty::Medium);
        let q2 = question("b", Category::Science, Difficulty::Easy);
        let q3 = question("c", Category::History, Difficulty::Hard);
        let response = ModelResponse::new("x", 50.0, 3);

        let degraded_verdict = EnsembleCombiner::new().combine(vec![
            DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)),
            DetectorOutcome::unavailable(DetectorKind::SelfConsistency, "all samples failed"),
        ]);
        let records = vec![
            EvaluationRecord::scored(q1.clone(), response.clone(), verdict(Label::Hallucination))
                .with_errors(vec!["sample: Timeout (gave up after 3 attempts)".to_string()]),
            EvaluationRecord::scored(q2.clone(), response.clone(), degraded_verdict.clone()),
            EvaluationRecord::failed(q3, "provider rejected the request"),
        ];

        let mut incremental = ResultAggregator::new();
        incremental.add(&q1, &response, &verdict(Label::Hallucination));
        incremental.add(&q2, &response, &degraded_verdict);
        incremental.record_failure();
        incremental.record_provider_errors(2);

        let rebuilt = ResultAggregator::from_records(&records).finalize();
        let expected = incremental.finalize();
        assert_eq!(rebuilt.by_category, expected.by_category);
        assert_eq!(rebuilt.by_difficulty, expected.by_difficulty);
        assert_eq!(rebuilt.failures, 1);
        assert_eq!(rebuilt.degraded, 1);
        assert_eq!(rebuilt.provider_errors, 2);
        assert_eq!(rebuilt.provider_errors, expected.provider_errors);
        assert_eq!(rebuilt.total_questions, 3);
        assert_eq!(rebuilt.evaluated, 2);
        // failed records stay out of the buckets
        assert!(rebuilt.category(Category::History).is_none());
    }
}
