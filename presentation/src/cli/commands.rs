//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted tables per category, difficulty and trigger group
    Full,
    /// The summary as JSON
    Json,
}

impl From<OutputFormat> for veracity_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => veracity_domain::OutputFormat::Full,
            OutputFormat::Json => veracity_domain::OutputFormat::Json,
        }
    }
}

impl From<veracity_domain::OutputFormat> for OutputFormat {
    fn from(format: veracity_domain::OutputFormat) -> Self {
        match format {
            veracity_domain::OutputFormat::Full => OutputFormat::Full,
            veracity_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for veracity
#[derive(Parser, Debug)]
#[command(name = "veracity")]
#[command(
    author,
    version,
    about = "Hallucination benchmark - score model answers against a labeled corpus"
)]
#[command(long_about = r#"
Veracity asks a model every question of a labeled corpus and classifies
each answer as CORRECT, HALLUCINATION or UNCERTAIN.

Three detectors vote on each answer:
1. Token overlap: does the answer contain the expected answer?
2. Self-consistency: do re-sampled answers agree with each other?
3. Contradiction: does the answer contradict itself?

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./veracity.toml     Project-level config
3. ~/.config/veracity/config.toml   Global config

Example:
  veracity run --corpus data/questions.json -m groq:llama-3.1-8b-instant
  veracity run --corpus data/questions.json -m openai:gpt-4o-mini -m groq:llama-3.1-8b-instant --sample 50
  veracity reaggregate results/groq_llama-3.1-8b-instant_20260301T120000Z.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Skip config file discovery; only --config, if given, is read
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs (debug level) to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one or more models against a corpus
    Run(RunArgs),
    /// Recompute summaries from stored result files without calling any provider
    Reaggregate(ReaggregateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Question corpus (JSON); defaults to `run.corpus` from the config
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Models to evaluate as `provider:model` (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Evaluate only the first N questions
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Temperature of the primary response
    #[arg(long, value_name = "T")]
    pub temperature: Option<f64>,

    /// Self-consistency samples per question (0 disables the detector)
    #[arg(long, value_name = "N")]
    pub samples: Option<usize>,

    /// Questions evaluated at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Directory for result files and reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append evaluation events (responses, verdicts, failures) as JSONL
    #[arg(long, value_name = "PATH")]
    pub events_log: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReaggregateArgs {
    /// Result files written by `veracity run`
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_several_models() {
        let cli = Cli::parse_from([
            "veracity",
            "-vv",
            "run",
            "--corpus",
            "questions.json",
            "-m",
            "openai:gpt-4o-mini",
            "-m",
            "groq:llama-3.1-8b-instant",
            "--sample",
            "25",
            "--output",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.model.len(), 2);
                assert_eq!(args.sample, Some(25));
                assert_eq!(args.output, Some(OutputFormat::Json));
                assert_eq!(args.corpus, Some(PathBuf::from("questions.json")));
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reaggregate() {
        let cli = Cli::parse_from(["veracity", "reaggregate", "a.json", "b.json", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Some(Command::Reaggregate(args)) => assert_eq!(args.files.len(), 2),
            other => panic!("expected reaggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_reaggregate_requires_a_file() {
        assert!(Cli::try_parse_from(["veracity", "reaggregate"]).is_err());
    }
}
