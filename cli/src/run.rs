//! `veracity run`: evaluate models against a corpus

use anyhow::{Context, Result, bail};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;
use veracity_application::{
    EvaluationLogger, EvaluationProgress, LlmProvider, NoProgress, RunBenchmarkUseCase,
};
use veracity_domain::RunSummary;
use veracity_infrastructure::{
    CorpusLoader, FileConfig, JsonlEvaluationLogger, ModelTarget, ProviderRegistry, ResultFile,
    ResultStore,
};
use veracity_presentation::{
    ConsoleFormatter, OutputConfig, OutputFormat, OutputFormatter, ProgressReporter, RunArgs,
    SimpleProgress, TextReport,
};

pub async fn execute(args: RunArgs, config: FileConfig, output: OutputConfig) -> Result<()> {
    let corpus_path = args
        .corpus
        .clone()
        .or_else(|| config.run.corpus.clone())
        .context("No corpus given: pass --corpus or set run.corpus in the config")?;
    let questions = CorpusLoader::load_sample(&corpus_path, args.sample)
        .with_context(|| format!("Failed to load corpus {}", corpus_path.display()))?;
    if questions.is_empty() {
        bail!("Corpus {} contains no questions", corpus_path.display());
    }

    let config = with_overrides(config, &args);
    crate::check_config(&config)?;
    let params = config.to_evaluation_params();

    // === Dependency Injection ===
    // Build every provider before the first run so a missing key fails fast
    let registry = ProviderRegistry::new(config.providers.clone(), params.call_timeout)?;
    let targets = model_targets(&registry, &args.model)?;
    let providers: Vec<(ModelTarget, Arc<dyn LlmProvider>)> = targets
        .into_iter()
        .map(|target| {
            let provider = registry
                .build(&target)
                .with_context(|| format!("Cannot set up {}", target))?;
            Ok((target, provider))
        })
        .collect::<Result<_>>()?;

    let events_path = args.events_log.clone().or_else(|| config.output.event_log.clone());
    let logger: Option<Arc<dyn EvaluationLogger>> = match events_path {
        Some(path) => {
            let logger = JsonlEvaluationLogger::open(&path)
                .with_context(|| format!("Failed to open event log {}", path.display()))?;
            info!(path = %path.display(), "Writing evaluation events");
            let logger: Arc<dyn EvaluationLogger> = Arc::new(logger);
            Some(logger)
        }
        None => None,
    };

    let store = ResultStore::new(
        args.output_dir
            .clone()
            .unwrap_or_else(|| config.output.dir.clone()),
    );
    let progress: Box<dyn EvaluationProgress> = if !output.progress_enabled() {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let mut summaries = Vec::with_capacity(providers.len());
    for (target, provider) in providers {
        let mut use_case = RunBenchmarkUseCase::new(provider, params.clone());
        if let Some(logger) = &logger {
            use_case = use_case.with_logger(Arc::clone(logger));
        }

        let run = use_case
            .execute_with_progress(questions.clone(), progress.as_ref())
            .await
            .with_context(|| format!("Benchmark of {} failed", target))?;

        let file = ResultFile::from_run(
            run,
            &target.provider,
            &target.model,
            Some(corpus_path.display().to_string()),
            params.detection.clone(),
            params.temperature,
        );
        let path = store.write(&file)?;
        let report = TextReport.format(&target.to_string(), &file.summary);
        let report_path = store.write_report(&path, &report)?;

        if output.format == OutputFormat::Full {
            println!("{}", ConsoleFormatter.format(&target.to_string(), &file.summary));
            println!("Results: {}", path.display());
            println!("Report:  {}\n", report_path.display());
        }
        summaries.push((target.to_string(), file.summary));
    }

    print_summaries(&summaries, output.format);
    Ok(())
}

/// File configuration with command-line overrides applied, so validation
/// sees the values the run will use
fn with_overrides(mut config: FileConfig, args: &RunArgs) -> FileConfig {
    if let Some(temperature) = args.temperature {
        config.run.temperature = temperature;
    }
    if let Some(workers) = args.concurrency {
        config.run.concurrency = workers;
    }
    if let Some(samples) = args.samples {
        config.detection = config.detection.with_samples(samples);
    }
    config
}

fn model_targets(registry: &ProviderRegistry, models: &[String]) -> Result<Vec<ModelTarget>> {
    if models.is_empty() {
        let Some(default) = registry.default_model() else {
            bail!("No model given: pass --model provider:model or set providers.default_model");
        };
        return Ok(vec![registry.parse_target(default)?]);
    }
    models
        .iter()
        .map(|m| registry.parse_target(m).map_err(Into::into))
        .collect()
}

/// JSON goes out as one document; the console gets a comparison table
/// when several models ran.
fn print_summaries(summaries: &[(String, RunSummary)], format: OutputFormat) {
    match format {
        OutputFormat::Json => match summaries {
            [(model, summary)] => println!("{}", ConsoleFormatter.format_json(model, summary)),
            _ => println!("{}", ConsoleFormatter.format_json_many(summaries)),
        },
        OutputFormat::Full if summaries.len() > 1 => {
            println!("{}", ConsoleFormatter.format_comparison(summaries));
        }
        OutputFormat::Full => {}
    }
}
