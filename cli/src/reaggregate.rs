//! `veracity reaggregate`: recompute summaries from result files

use anyhow::{Context, Result};
use tracing::{info, warn};
use veracity_infrastructure::ResultStore;
use veracity_presentation::{
    ConsoleFormatter, OutputConfig, OutputFormat, OutputFormatter, ReaggregateArgs,
};

pub fn execute(args: &ReaggregateArgs, output: OutputConfig) -> Result<()> {
    let mut summaries = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let file = ResultStore::read(path)
            .with_context(|| format!("Failed to read result file {}", path.display()))?;
        let summary = file.reaggregate();
        if summary != file.summary {
            warn!(
                path = %path.display(),
                "Stored summary differs from the recomputed one; showing the recomputed summary"
            );
        }
        info!(path = %path.display(), records = file.records.len(), "Re-aggregated");
        summaries.push((file.display_name(), summary));
    }

    match output.format {
        OutputFormat::Json => match summaries.as_slice() {
            [(model, summary)] => println!("{}", ConsoleFormatter.format_json(model, summary)),
            _ => println!("{}", ConsoleFormatter.format_json_many(&summaries)),
        },
        OutputFormat::Full => {
            for (model, summary) in &summaries {
                println!("{}", ConsoleFormatter.format(model, summary));
            }
            if summaries.len() > 1 {
                println!("{}", ConsoleFormatter.format_comparison(&summaries));
            }
        }
    }
    Ok(())
}
