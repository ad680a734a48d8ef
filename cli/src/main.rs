//! CLI entrypoint for veracity
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod reaggregate;
mod run;

use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use veracity_infrastructure::{ConfigLoader, FileConfig};
use veracity_presentation::{Cli, Command, OutputConfig, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    info!("Starting veracity");

    match command {
        Command::Run(args) => {
            let output = output_config(&config, args.output, cli.no_color, cli.quiet);
            run::execute(args, config, output).await
        }
        Command::Reaggregate(args) => {
            let output = output_config(&config, args.output, cli.no_color, cli.quiet);
            reaggregate::execute(&args, output)
        }
    }
}

/// Initialize logging based on verbosity level, plus an optional file layer
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Load configuration. `--no-config` skips discovery, so only an explicit
/// `--config` file is read over the defaults.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let loaded = match (cli.no_config, cli.config.as_deref()) {
        (true, None) => return Ok(ConfigLoader::load_defaults()),
        (true, Some(path)) => ConfigLoader::load_file(path),
        (false, explicit) => ConfigLoader::load(explicit),
    };
    loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))
}

/// Validate the effective configuration; errors abort, warnings are logged.
pub(crate) fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn output_config(
    config: &FileConfig,
    format: Option<OutputFormat>,
    no_color: bool,
    quiet: bool,
) -> OutputConfig {
    let file = OutputConfig {
        format: config.output.format.map(OutputFormat::from).unwrap_or(OutputFormat::Full),
        color: config.output.color,
        show_progress: config.output.progress,
    };
    let output = file.with_overrides(format, no_color, quiet);
    output.apply_color();
    output
}
