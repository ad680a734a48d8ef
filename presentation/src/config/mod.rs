//! Presentation-level configuration
//!
//! Settings for how results are rendered, after command-line flags have
//! been applied over the configuration file.

use crate::cli::commands::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show a progress bar while questions are evaluated
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Apply command-line overrides; a flag always wins over the file.
    pub fn with_overrides(
        mut self,
        format: Option<OutputFormat>,
        no_color: bool,
        quiet: bool,
    ) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        if no_color {
            self.color = false;
        }
        if quiet {
            self.show_progress = false;
        }
        self
    }

    /// Apply the color setting to all later terminal output.
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }

    /// JSON output goes to stdout untouched; progress would interleave with it.
    pub fn progress_enabled(&self) -> bool {
        self.show_progress && self.format == OutputFormat::Full
    }
}
