//! Plain-text report written next to each result file

use super::formatter::OutputFormatter;
use super::pct;
use std::fmt::Write;
use veracity_domain::{BucketStats, RunSummary, TrendStatus};

/// Uncolored report suitable for files
pub struct TextReport;

impl TextReport {
    fn table(out: &mut String, title: &str, buckets: &[BucketStats]) {
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(
            out,
            "  {:<16} {:>6} {:>9} {:>13} {:>10} {:>11}",
            "group", "n", "accuracy", "hallucination", "uncertain", "latency_ms"
        );
        for b in buckets {
            let _ = writeln!(
                out,
                "  {:<16} {:>6} {:>9} {:>13} {:>10} {:>11.0}",
                b.key,
                b.total,
                pct(b.accuracy),
                pct(b.hallucination_rate),
                pct(b.uncertain_rate),
                b.mean_latency_ms
            );
        }
        out.push('\n');
    }
}

impl OutputFormatter for TextReport {
    fn format(&self, model: &str, summary: &RunSummary) -> String {
        let mut out = String::new();
        let o = &summary.overall;
        let _ = writeln!(out, "Hallucination benchmark report");
        let _ = writeln!(out, "Model: {}", model);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Questions: {}  evaluated: {}  could not be evaluated: {}  degraded: {}",
            summary.total_questions, summary.evaluated, summary.failures, summary.degraded
        );
        let _ = writeln!(out, "Provider errors: {}", summary.provider_errors);
        let _ = writeln!(
            out,
            "Correct: {} ({})  Hallucination: {} ({})  Uncertain: {} ({})",
            o.correct,
            pct(o.accuracy),
            o.hallucinated,
            pct(o.hallucination_rate),
            o.uncertain,
            pct(o.uncertain_rate)
        );
        let _ = writeln!(
            out,
            "Mean latency: {:.0} ms  mean tokens: {:.1}",
            o.mean_latency_ms, o.mean_tokens
        );
        out.push('\n');

        Self::table(&mut out, "By category", &summary.by_category);
        Self::table(&mut out, "By difficulty", &summary.by_difficulty);
        Self::table(&mut out, "By trigger", &summary.by_trigger);

        let trend = &summary.difficulty_trend;
        let _ = writeln!(out, "Difficulty trend: {}", trend.status.as_str());
        if trend.status == TrendStatus::Violated {
            for v in &trend.violations {
                let _ = writeln!(
                    out,
                    "  {} ({}) > {} ({})",
                    v.from,
                    pct(v.from_rate),
                    v.to,
                    pct(v.to_rate)
                );
            }
        }

        if !summary.hallucination_kinds.is_empty() {
            let _ = writeln!(out, "\nHallucination kinds");
            for k in &summary.hallucination_kinds {
                let _ = writeln!(out, "  {:<18} {}", k.kind.as_str(), k.count);
            }
        }
        out
    }

    fn format_comparison(&self, runs: &[(String, RunSummary)]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<36} {:>9} {:>13} {:>10} {:>11} {:>8} {:>8}",
            "model", "accuracy", "hallucination", "uncertain", "latency_ms", "tokens", "failed"
        );
        for (model, s) in runs {
            let o = &s.overall;
            let _ = writeln!(
                out,
                "{:<36} {:>9} {:>13} {:>10} {:>11.0} {:>8.1} {:>8}",
                model,
                pct(o.accuracy),
                pct(o.hallucination_rate),
                pct(o.uncertain_rate),
                o.mean_latency_ms,
                o.mean_tokens,
                s.failures
            );
        }
        out
    }
}
