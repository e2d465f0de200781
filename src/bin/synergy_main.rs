//! emg-synergy command line driver
//!
//! **Usage:**
//! ```bash
//! emg-synergy analyze <ROOT>... [--json] [--no-artifacts]
//! emg-synergy summarize <ROOT>
//! emg-synergy config [--export <FILE>]
//! ```
//!
//! Each `<ROOT>` is a session folder holding recordings in `EMG/`; results go
//! to `<ROOT>/synergy_results`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use emg_synergy::config::{ConfigLoader, SynergyConfig};
use emg_synergy::pipeline::{TaskRunner, TaskSpec};
use emg_synergy::report::Summarizer;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Muscle synergy extraction from multichannel EMG
#[derive(Parser, Debug)]
#[command(name = "emg-synergy", version)]
struct Cli {
    /// Configuration file(s), merged in order over the defaults
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Vec<PathBuf>,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract synergies for one or more session folders
    Analyze {
        /// Session root folders
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Print the task reports as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Skip the correlation, weight and ranking tables and figures
        #[arg(long)]
        no_artifacts: bool,
    },

    /// Aggregate every task report below a folder
    Summarize {
        root: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ConfigLoader::with_paths(cli.config.clone())
        .load()
        .context("failed to load configuration")?;

    match cli.command {
        Command::Analyze { roots, json, no_artifacts } => analyze(config, &roots, json, !no_artifacts),
        Command::Summarize { root } => summarize(&root),
        Command::Config { export } => show_config(&config, export),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "emg_synergy=debug" } else { "emg_synergy=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(config: SynergyConfig, roots: &[PathBuf], json: bool, artifacts: bool) -> Result<()> {
    let mut tasks = Vec::with_capacity(roots.len());
    for root in roots {
        let root = root
            .canonicalize()
            .with_context(|| format!("cannot resolve session folder {}", root.display()))?;
        tasks.push(TaskSpec::from_root(&root, &config.loader)?);
    }

    let runner = TaskRunner::new(config).with_artifacts(artifacts);
    let results = runner.run_batch(&tasks);

    let mut reports = Vec::new();
    let mut failed = 0usize;
    for (task, result) in results {
        match result {
            Ok(outcome) => {
                if !outcome.search.criterion_met() {
                    warn!(task = %task, "VAF criterion not met, report uses the largest attempted rank");
                }
                reports.push(outcome.report);
            }
            Err(_) => failed += 1,
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    info!(succeeded = reports.len(), failed, "analysis finished");
    if reports.is_empty() {
        bail!("all {failed} task(s) failed");
    }
    Ok(())
}

fn summarize(root: &Path) -> Result<()> {
    match Summarizer::new(root).summarize()? {
        Some(summary) => {
            for row in &summary.ranking {
                println!("{:<24} {}", row.channel, row.times_discarded);
            }
        }
        None => println!("no task reports found under {}", root.display()),
    }
    Ok(())
}

fn show_config(config: &SynergyConfig, export: Option<PathBuf>) -> Result<()> {
    match export {
        Some(path) => {
            ConfigLoader::export_config(config, &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "configuration exported");
        }
        None => print!("{}", ConfigLoader::to_toml(config)?),
    }
    Ok(())
}
