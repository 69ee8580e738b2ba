//! Run command implementation.

use super::output::{format_round, format_text};
use super::{CliError, OutputFormat, load_map};
use indicatif::{ProgressBar, ProgressStyle};
use lighthouses::arena::{MatchConfig, run_match};
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or the match aborts.
pub(crate) fn execute(
    map_path: &Path,
    bots: &[String],
    config: MatchConfig,
    format: OutputFormat,
    progress: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let map = load_map(map_path)?;

    if !quiet && format == OutputFormat::Text {
        println!("Running {} rounds on {}...", config.rounds, map_path.display());
        println!("Players: {}", bots.join(", "));
        println!();
    }

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(u64::from(config.rounds));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rounds ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let result = run_match(&map, bots, config, |report, _| {
        if let Some(pb) = &pb {
            pb.inc(1);
        } else if !quiet && format == OutputFormat::Text {
            println!("{}", format_round(report));
        }
    });

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let result = result?;

    match format {
        OutputFormat::Text => {
            if !quiet {
                println!();
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
