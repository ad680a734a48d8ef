//! Output formatter trait

use veracity_domain::RunSummary;

/// Trait for rendering a run summary
pub trait OutputFormatter {
    /// Full human-readable report for one model
    fn format(&self, model: &str, summary: &RunSummary) -> String;

    /// Side-by-side comparison of several models
    fn format_comparison(&self, runs: &[(String, RunSummary)]) -> String;

    /// Summary as JSON
    fn format_json(&self, model: &str, summary: &RunSummary) -> String {
        let value = serde_json::json!({ "model": model, "summary": summary });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Several summaries as one JSON array
    fn format_json_many(&self, runs: &[(String, RunSummary)]) -> String {
        let values: Vec<serde_json::Value> = runs
            .iter()
            .map(|(model, summary)| serde_json::json!({ "model": model, "summary": summary }))
            .collect();
        serde_json::to_string_pretty(&values).unwrap_or_else(|_| "[]".to_string())
    }
}
