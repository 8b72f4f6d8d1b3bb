//! Command-line interface for anima.
//!
//! Provides commands for curating the daily edition, inspecting the mood
//! of a headline and the current edition, running the scheduler, and
//! ingesting new works.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::adapters::{GNewsClient, WebMetadataLookup};
use crate::config::Settings;
use crate::core::{classify, excluded_ids_from_path, CurationReport, Curator};
use crate::ingest::Ingestor;
use crate::marketing::Marketer;
use crate::scheduler::Scheduler;

/// anima - news-driven daily art curator
#[derive(Parser, Debug)]
#[command(name = "anima")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Curate and publish today's edition
    Curate {
        /// Use this headline instead of fetching one
        #[arg(long)]
        headline: Option<String>,

        /// Seed for a reproducible selection
        #[arg(long)]
        seed: Option<u64>,

        /// Master library JSON
        #[arg(long)]
        library: Option<PathBuf>,

        /// Front-end data file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the SEO, RSS and social updates
        #[arg(long)]
        no_marketing: bool,
    },

    /// Print the mood a headline maps to
    Mood {
        /// Headline text
        headline: String,
    },

    /// List the ids shown by the current edition
    Shown {
        /// Front-end data file to read
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Curate on a fixed interval until interrupted
    Schedule {
        /// Seconds between cycles
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many cycles
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// Look up new works and write draft library entries
    Ingest {
        /// List of `type: title` lines
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Drafts JSON to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Commands::Curate {
                headline,
                seed,
                library,
                output,
                no_marketing,
            } => curate(settings, headline, seed, library, output, no_marketing).await,
            Commands::Mood { headline } => {
                println!("{}", classify(&headline));
                Ok(())
            }
            Commands::Shown { output } => show_shown(&settings, output).await,
            Commands::Schedule {
                interval,
                max_cycles,
            } => schedule(&settings, interval, max_cycles).await,
            Commands::Ingest { input, output } => ingest(&settings, input, output).await,
            Commands::Config => show_config(&settings),
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Run one curation cycle
async fn curate(
    settings: Settings,
    headline: Option<String>,
    seed: Option<u64>,
    library: Option<PathBuf>,
    output: Option<PathBuf>,
    no_marketing: bool,
) -> Result<()> {
    let source = GNewsClient::new(settings.news.api_key.clone(), settings.news.timeout())
        .with_endpoint(settings.news.endpoint.clone());

    let mut curator = Curator::new(
        library.unwrap_or(settings.library),
        output.unwrap_or(settings.output),
        Box::new(source),
    );
    if !no_marketing {
        curator = curator.with_marketer(Marketer::new(settings.site));
    }

    let report = curator.run(headline, &mut rng_from(seed)).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &CurationReport) {
    println!("Headline: {} [{}]", report.headline, report.origin);
    println!("Mood:     {}", report.mood);
    println!("Avoided:  {} recently shown item(s)", report.excluded);
    for (category, ids) in &report.selected {
        println!("  {:<7} {}", category.as_str(), ids.join(", "));
    }
    println!("Updated:  {}", report.artifact.display());

    if let Some(marketing) = &report.marketing {
        if marketing.is_success() {
            println!("Marketing: {}", marketing.completed.join(", "));
        } else {
            for (step, error) in &marketing.failed {
                eprintln!("Marketing step '{}' failed: {}", step, error);
            }
        }
    }
}

/// Print the ids the current artifact records as shown
async fn show_shown(settings: &Settings, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| settings.output.clone());
    let ids: BTreeSet<String> = excluded_ids_from_path(&path).await.into_iter().collect();

    if ids.is_empty() {
        println!("No items recorded in {}", path.display());
        return Ok(());
    }

    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

async fn schedule(settings: &Settings, interval: Option<u64>, max_cycles: Option<u64>) -> Result<()> {
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.scheduler.interval());

    let summary = Scheduler::for_current_exe(Vec::new(), interval)?
        .with_max_cycles(max_cycles)
        .run()
        .await?;

    println!(
        "Scheduler ran {} cycle(s), {} failed",
        summary.cycles, summary.failures
    );
    Ok(())
}

async fn ingest(settings: &Settings, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| settings.ingest.input.clone());
    let output = output.unwrap_or_else(|| settings.ingest.output.clone());

    let lookup = WebMetadataLookup::new(settings.ingest.timeout())
        .context("Failed to set up metadata lookups")?;
    let ingestor = Ingestor::new(Box::new(lookup), settings.ingest.request_delay());

    let summary = ingestor.run(&input, &output, &mut StdRng::from_os_rng()).await?;

    println!(
        "Found {} of {} work(s), drafts in {}",
        summary.found,
        summary.requested,
        output.display()
    );
    for query in &summary.missing {
        println!("  not found: {}", query);
    }
    Ok(())
}

fn show_config(settings: &Settings) -> Result<()> {
    println!("════════════════════════════════════════════════════════════");
    println!("  Anima Configuration");
    println!("════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        settings
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Library:  {}", settings.library.display());
    println!("  Output:   {}", settings.output.display());
    println!();
    println!("Site:");
    println!("  URL:      {}", settings.site.url);
    println!("  HTML:     {}", settings.site.html_file.display());
    println!("  RSS:      {}", settings.site.rss_file.display());
    println!("  Social:   {}", settings.site.social_file.display());
    println!();
    println!("News:");
    println!("  Endpoint: {}", settings.news.endpoint);
    println!(
        "  API key:  {}",
        if settings.news.api_key.is_some() { "(set)" } else { "(none - simulated headlines)" }
    );
    println!("  Timeout:  {}s", settings.news.timeout_seconds);
    println!();
    println!("Scheduler:");
    println!("  Interval: {}s", settings.scheduler.interval_seconds);
    println!();
    println!("Ingest:");
    println!("  Input:    {}", settings.ingest.input.display());
    println!("  Output:   {}", settings.ingest.output.display());
    println!("  Delay:    {}ms", settings.ingest.request_delay_ms);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_curate_flags() {
        let cli = Cli::try_parse_from([
            "anima", "curate", "--headline", "AI rises", "--seed", "7", "--no-marketing",
        ])
        .unwrap();

        match cli.command {
            Commands::Curate {
                headline,
                seed,
                no_marketing,
                library,
                ..
            } => {
                assert_eq!(headline.as_deref(), Some("AI rises"));
                assert_eq!(seed, Some(7));
                assert!(no_marketing);
                assert!(library.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_schedule_flags() {
        let cli = Cli::try_parse_from(["anima", "schedule", "--interval", "5", "--max-cycles", "2"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Schedule { interval: Some(5), max_cycles: Some(2) }
        ));
    }

    #[test]
    fn test_mood_requires_headline() {
        assert!(Cli::try_parse_from(["anima", "mood"]).is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u64 = rng_from(Some(3)).random();
        let b: u64 = rng_from(Some(3)).random();
        assert_eq!(a, b);
    }
}
