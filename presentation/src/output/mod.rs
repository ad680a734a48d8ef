pub mod console;
pub mod formatter;
pub mod report;

/// Percentage with one decimal
pub(crate) fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
