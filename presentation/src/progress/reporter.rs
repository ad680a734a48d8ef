//! Progress reporting for benchmark runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use veracity_application::EvaluationProgress;
use veracity_domain::core::string::preview;
use veracity_domain::{EvaluationRecord, EvaluationStatus, Label, RunSummary};

/// Running label counts shown next to the bar
#[derive(Default)]
struct Tally {
    correct: AtomicU64,
    hallucinated: AtomicU64,
    uncertain: AtomicU64,
    failed: AtomicU64,
}

impl Tally {
    fn record(&self, record: &EvaluationRecord) {
        let counter = match record.verdict.as_ref().map(|v| v.label) {
            Some(Label::Correct) => &self.correct,
            Some(Label::Hallucination) => &self.hallucinated,
            Some(Label::Uncertain) => &self.uncertain,
            None => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        for counter in [&self.correct, &self.hallucinated, &self.uncertain, &self.failed] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn message(&self) -> String {
        format!(
            "{} {}  {} {}  {} {}  {} {}",
            "C".green(),
            self.correct.load(Ordering::Relaxed),
            "H".red(),
            self.hallucinated.load(Ordering::Relaxed),
            "U".yellow(),
            self.uncertain.load(Ordering::Relaxed),
            "F".dimmed(),
            self.failed.load(Ordering::Relaxed)
        )
    }
}

/// Reports progress of a run with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    tally: Tally,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            tally: Tally::default(),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationProgress for ProgressReporter {
    fn on_run_start(&self, model: &str, total_questions: usize) {
        let pb = ProgressBar::new(total_questions as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix(model.to_string());
        self.tally.reset();
        pb.set_message(self.tally.message());

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_question_complete(&self, record: &EvaluationRecord) {
        self.tally.record(record);
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(self.tally.message());
            pb.inc(1);
        }
    }

    fn on_run_complete(&self, _model: &str, summary: &RunSummary) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!(
                "{} {} evaluated, {} failed",
                "done".green(),
                summary.evaluated,
                summary.failures
            ));
        }
    }
}

/// Line-per-question progress on stderr, for logs and non-interactive
/// terminals where a redrawn bar would be noise
pub struct SimpleProgress;

impl SimpleProgress {
    fn line(record: &EvaluationRecord) -> String {
        let id = record.question.id();
        match (&record.verdict, record.status) {
            (Some(verdict), EvaluationStatus::Degraded) => {
                format!("  {} {} {} (degraded)", "~".yellow(), id, verdict.label)
            }
            (Some(verdict), _) => {
                let mark = match verdict.label {
                    Label::Correct => "v".green(),
                    Label::Hallucination => "x".red(),
                    Label::Uncertain => "?".yellow(),
                };
                format!("  {} {} {}", mark, id, verdict.label)
            }
            (None, _) => format!(
                "  {} {} (failed: {})",
                "!".red(),
                id,
                preview(
                    record.errors.first().map(String::as_str).unwrap_or("unknown error"),
                    80
                )
            ),
        }
    }
}

impl EvaluationProgress for SimpleProgress {
    fn on_run_start(&self, model: &str, total_questions: usize) {
        eprintln!(
            "{} {} ({} questions)",
            "->".cyan(),
            model.bold(),
            total_questions
        );
    }

    fn on_question_complete(&self, record: &EvaluationRecord) {
        eprintln!("{}", Self::line(record));
    }

    fn on_run_complete(&self, model: &str, summary: &RunSummary) {
        eprintln!(
            "{} {}: {} evaluated, {} failed\n",
            "done".green(),
            model,
            summary.evaluated,
            summary.failures
        );
    }
}
