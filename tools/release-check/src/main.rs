//! Release Name Checker
//!
//! Runs release names through the same parser the service uses, against a
//! real config file, so show lists and source defaults can be checked
//! without connecting anywhere.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mihari::ShowIndex;
use mihari::config::{Config, SourceConfig};
use mihari_core::parser::EpisodeParser;
use mihari_core::types::{GroupRef, SourceRef};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stand-in link for records produced without a feed or announce line.
const OFFLINE_LINK: &str = "offline://release-check";

/// CLI arguments
#[derive(Parser)]
#[command(name = "release-check")]
#[command(about = "Check release names against a Mihari config")]
#[command(version)]
struct Cli {
    /// Path to the service config file
    #[arg(short, long, env = "MIHARI_CONFIG")]
    config: PathBuf,

    /// Group key selecting the source entry to check against
    #[arg(short, long)]
    group: String,

    /// Print matched episodes as JSON records instead of a summary
    #[arg(long)]
    json: bool,

    /// Release names to check; read from stdin when empty
    names: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let source_config = config
        .source_by_group(&cli.group)
        .with_context(|| format!("no source configured for group {}", cli.group))?;

    let shows = Arc::new(ShowIndex::new(config.shows.clone()));
    info!(
        group = %cli.group,
        shows = shows.len(),
        "checking against configured source"
    );

    let source = source_ref(source_config, shows);
    let parser = EpisodeParser::new()?;
    let names = collect_names(&cli.names)?;
    let failed = check_names(&parser, &source, &names, cli.json)?;

    info!(total = names.len(), failed, "checked release names");
    if failed > 0 {
        bail!("{failed} of {} names did not match", names.len());
    }
    Ok(())
}

/// Parse context equivalent to what the service builds for this source.
fn source_ref(config: &SourceConfig, shows: Arc<ShowIndex>) -> SourceRef {
    SourceRef {
        fetch_kind: config.fetch,
        defaults: config.defaults.clone(),
        group: GroupRef {
            key: config.group.key.clone(),
            name: config.group.name.clone(),
            shows,
        },
    }
}

fn collect_names(args: &[String]) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }
    let mut names = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    Ok(names)
}

/// Parses every name, printing results, and returns how many did not yield
/// a wanted episode.
fn check_names(
    parser: &EpisodeParser,
    source: &SourceRef,
    names: &[String],
    json: bool,
) -> Result<usize> {
    let mut failed = 0;
    for name in names {
        let options = source.fetch_kind.options_for(OFFLINE_LINK);
        match parser.parse_wanted_episode(name, options, source)? {
            Some(episode) => {
                if json {
                    println!("{}", serde_json::to_string(&episode)?);
                } else {
                    println!("{name}");
                    println!("  -> {episode}");
                }
            }
            None => {
                failed += 1;
                if !json {
                    println!("{name}");
                    println!("  -> not wanted");
                }
            }
        }
    }
    Ok(failed)
}
