//! Daily curation run.
//!
//! One run goes headline → mood → (library, shown ids, mood) → edition →
//! rendered artifact → marketing, strictly in that order. Only the library
//! load and the artifact write can fail the run; everything else degrades
//! to a fallback and a warning.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::adapters::{simulated_headline, HeadlineError, HeadlineSource};
use crate::domain::{Category, Edition, EditionEntry, Mood};
use crate::library::Library;
use crate::marketing::{Campaign, CampaignReport, Marketer};

use super::classifier::classify;
use super::freshness::excluded_ids_from_path;
use super::render::{render, write_artifact};
use super::selection::select_edition;

/// Where the day's headline came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlineOrigin {
    /// Fetched from a live source
    Live(String),
    /// Offline fallback
    Simulated,
    /// Supplied by the operator
    Manual,
}

impl fmt::Display for HeadlineOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadlineOrigin::Live(source) => write!(f, "live ({})", source),
            HeadlineOrigin::Simulated => write!(f, "simulated"),
            HeadlineOrigin::Manual => write!(f, "manual"),
        }
    }
}

/// Summary of a completed run
#[derive(Debug)]
pub struct CurationReport {
    pub headline: String,
    pub origin: HeadlineOrigin,
    pub mood: Mood,
    /// Number of ids shown by the previous edition
    pub excluded: usize,
    /// Selected ids per category, in rank order
    pub selected: BTreeMap<Category, Vec<String>>,
    /// Path of the written artifact
    pub artifact: PathBuf,
    /// Marketing outcome, `None` when marketing is disabled
    pub marketing: Option<CampaignReport>,
}

/// Curates and publishes the daily edition
pub struct Curator {
    library_path: PathBuf,
    output_path: PathBuf,
    headline_source: Box<dyn HeadlineSource>,
    marketer: Option<Marketer>,
}

impl Curator {
    /// Create a curator reading `library_path` and writing `output_path`
    pub fn new(
        library_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        headline_source: Box<dyn HeadlineSource>,
    ) -> Self {
        Self {
            library_path: library_path.into(),
            output_path: output_path.into(),
            headline_source,
            marketer: None,
        }
    }

    /// Publish marketing artifacts after each run
    pub fn with_marketer(mut self, marketer: Marketer) -> Self {
        self.marketer = Some(marketer);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Resolve the day's headline, falling back to a simulated one
    pub async fn resolve_headline<R: Rng + ?Sized>(
        &self,
        manual: Option<String>,
        rng: &mut R,
    ) -> (String, HeadlineOrigin) {
        if let Some(headline) = manual.filter(|h| !h.trim().is_empty()) {
            return (headline, HeadlineOrigin::Manual);
        }

        let source = self.headline_source.name().to_string();
        let fetched = self
            .headline_source
            .fetch_headlines()
            .await
            .and_then(|headlines| headlines.choose(rng).cloned().ok_or(HeadlineError::Empty));

        match fetched {
            Ok(headline) => {
                info!("Connected to headline source '{}'", source);
                (headline, HeadlineOrigin::Live(source))
            }
            Err(e) => {
                warn!("Headline source '{}' unavailable ({}), simulating input", source, e);
                (simulated_headline(rng), HeadlineOrigin::Simulated)
            }
        }
    }

    /// Run one curation cycle
    #[instrument(skip(self, manual_headline, rng), fields(output = %self.output_path.display()))]
    pub async fn run<R: Rng + ?Sized>(
        &self,
        manual_headline: Option<String>,
        rng: &mut R,
    ) -> Result<CurationReport> {
        let (headline, origin) = self.resolve_headline(manual_headline, rng).await;
        info!("Headline ({}): '{}'", origin, headline);

        let mood = classify(&headline);
        info!("Detected mood: {}", mood);

        let excluded = excluded_ids_from_path(&self.output_path).await;
        info!("Avoiding {} recently shown item(s)", excluded.len());

        let library = Library::load(&self.library_path)
            .await
            .context("Cannot curate without the library")?;

        let edition = select_edition(&library, mood, &excluded, rng);
        info!("Curation complete, {} item(s) selected", edition.len());

        let artifact = write_artifact(&self.output_path, render(&edition))
            .await
            .context("Failed to publish the edition")?;
        info!("Updated {}", artifact.display());

        let marketing = match &self.marketer {
            Some(marketer) => {
                let campaign = Campaign {
                    edition: &edition,
                    mood,
                    headline: &headline,
                    now: Utc::now(),
                };
                Some(marketer.run_campaign(&campaign).await)
            }
            None => None,
        };

        Ok(CurationReport {
            selected: selected_ids(&edition),
            headline,
            origin,
            mood,
            excluded: excluded.len(),
            artifact,
            marketing,
        })
    }
}

fn selected_ids(edition: &Edition) -> BTreeMap<Category, Vec<String>> {
    edition
        .iter()
        .map(|(category, entries)| {
            let ids = entries.iter().map(EditionEntry::id).map(str::to_string).collect();
            (category, ids)
        })
        .collect()
}
