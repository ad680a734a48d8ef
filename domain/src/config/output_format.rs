//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished run is reported on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored tables with per-bucket breakdowns (default)
    #[default]
    Full,
    /// The run summary as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full() {
        assert_eq!(OutputFormat::default(), OutputFormat::Full);
    }

    #[test]
    fn test_parses_lowercase_names() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(serde_json::to_value(OutputFormat::Full).unwrap(), "full");
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(serde_json::from_str::<OutputFormat>("\"table\"").is_err());
    }
}
