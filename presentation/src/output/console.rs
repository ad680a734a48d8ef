//! Console output formatter for run summaries

use super::formatter::OutputFormatter;
use super::pct;
use colored::{ColoredString, Colorize};
use veracity_domain::{BucketStats, RunSummary, TrendStatus};

/// Formats run summaries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(72);
        format!("{}\n{:^72}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(72))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(72).cyan())
    }

    /// Hallucination rates above a third read red, above a tenth yellow.
    fn rate_colored(rate: f64) -> ColoredString {
        let text = pct(rate);
        if rate > 0.33 {
            text.red()
        } else if rate > 0.10 {
            text.yellow()
        } else {
            text.green()
        }
    }

    fn table(buckets: &[BucketStats]) -> String {
        let mut output = format!(
            "  {:<16} {:>6} {:>9} {:>14} {:>10} {:>11} {:>8}\n",
            "group".dimmed(),
            "n".dimmed(),
            "accuracy".dimmed(),
            "hallucination".dimmed(),
            "uncertain".dimmed(),
            "latency_ms".dimmed(),
            "tokens".dimmed()
        );
        for b in buckets {
            if b.total == 0 {
                output.push_str(&format!(
                    "  {:<16} {:>6} {}\n",
                    b.key,
                    0,
                    "no verdicts".dimmed()
                ));
                continue;
            }
            output.push_str(&format!(
                "  {:<16} {:>6} {:>9} {:>14} {:>10} {:>11.0} {:>8.1}\n",
                b.key,
                b.total,
                pct(b.accuracy),
                Self::rate_colored(b.hallucination_rate),
                pct(b.uncertain_rate),
                b.mean_latency_ms,
                b.mean_tokens
            ));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, model: &str, summary: &RunSummary) -> String {
        let mut output = String::new();
        let o = &summary.overall;

        output.push_str(&Self::header("Hallucination Benchmark"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), model));
        output.push_str(&format!(
            "{} {} total, {} evaluated\n",
            "Questions:".cyan().bold(),
            summary.total_questions,
            summary.evaluated
        ));

        output.push_str(&Self::section_header("Overall"));
        output.push_str(&format!(
            "  {} {:>5}  {}\n",
            "CORRECT      ".green().bold(),
            o.correct,
            pct(o.accuracy)
        ));
        output.push_str(&format!(
            "  {} {:>5}  {}\n",
            "HALLUCINATION".red().bold(),
            o.hallucinated,
            Self::rate_colored(o.hallucination_rate)
        ));
        output.push_str(&format!(
            "  {} {:>5}  {}\n",
            "UNCERTAIN    ".yellow().bold(),
            o.uncertain,
            pct(o.uncertain_rate)
        ));
        output.push_str(&format!(
            "  mean latency {:.0} ms, mean tokens {:.1}\n",
            o.mean_latency_ms, o.mean_tokens
        ));

        // kept apart from the hallucination count
        if summary.failures > 0 || summary.degraded > 0 {
            output.push_str(&format!(
                "\n  {} {} could not be evaluated, {} scored without every detector\n",
                "!".yellow().bold(),
                summary.failures,
                summary.degraded
            ));
        }
        if summary.provider_errors > 0 {
            output.push_str(&format!(
                "  {} {} provider calls failed\n",
                "!".yellow().bold(),
                summary.provider_errors
            ));
        }

        output.push_str(&Self::section_header("By Category"));
        output.push_str(&Self::table(&summary.by_category));
        output.push_str(&Self::section_header("By Difficulty"));
        output.push_str(&Self::table(&summary.by_difficulty));
        output.push_str(&Self::section_header("By Trigger"));
        output.push_str(&Self::table(&summary.by_trigger));

        output.push_str(&Self::section_header("Difficulty Trend"));
        let trend = &summary.difficulty_trend;
        let status = match trend.status {
            TrendStatus::Satisfied => "satisfied: hallucinations rise with difficulty".green(),
            TrendStatus::Violated => "violated".red().bold(),
            TrendStatus::InsufficientData => "insufficient data".dimmed(),
        };
        output.push_str(&format!("  {}\n", status));
        for v in &trend.violations {
            output.push_str(&format!(
                "  {} {} ({}) -> {} ({})\n",
                "x".red(),
                v.from,
                pct(v.from_rate),
                v.to,
                pct(v.to_rate)
            ));
        }

        if !summary.hallucination_kinds.is_empty() {
            output.push_str(&Self::section_header("Hallucination Kinds"));
            for k in &summary.hallucination_kinds {
                output.push_str(&format!("  {:<18} {}\n", k.kind.as_str(), k.count));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_comparison(&self, runs: &[(String, RunSummary)]) -> String {
        let mut output = Self::header("Model Comparison");
        output.push('\n');
        output.push_str(&format!(
            "{:<36} {:>9} {:>14} {:>10} {:>11} {:>8} {:>7}\n",
            "model".bold(),
            "accuracy".bold(),
            "hallucination".bold(),
            "uncertain".bold(),
            "latency_ms".bold(),
            "tokens".bold(),
            "failed".bold()
        ));
        for (model, s) in runs {
            let o = &s.overall;
            output.push_str(&format!(
                "{:<36} {:>9} {:>14} {:>10} {:>11.0} {:>8.1} {:>7}\n",
                model,
                pct(o.accuracy),
                Self::rate_colored(o.hallucination_rate),
                pct(o.uncertain_rate),
                o.mean_latency_ms,
                o.mean_tokens,
                s.failures
            ));
        }
        output.push_str(&Self::footer());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_domain::ResultAggregator;

    #[test]
    fn test_empty_summary_renders() {
        colored::control::set_override(false);
        let summary = ResultAggregator::new().finalize();
        let text = ConsoleFormatter.format("openai:gpt-4o-mini", &summary);
        assert!(text.contains("openai:gpt-4o-mini"));
        assert!(text.contains("insufficient data"));
        // every difficulty tier is listed even without verdicts
        assert!(text.contains("medium"));
        assert!(!text.contains("could not be evaluated"));
    }

    #[test]
    fn test_failures_reported_separately() {
        colored::control::set_override(false);
        let mut agg = ResultAggregator::new();
        agg.record_failure();
        let text = ConsoleFormatter.format("m", &agg.finalize());
        assert!(text.contains("1 could not be evaluated"));
    }

    #[test]
    fn test_provider_errors_reported() {
        colored::control::set_override(false);
        let mut agg = ResultAggregator::new();
        agg.record_provider_errors(3);
        let text = ConsoleFormatter.format("m", &agg.finalize());
        assert!(text.contains("3 provider calls failed"));
        assert!(!text.contains("could not be evaluated"));
    }
}
