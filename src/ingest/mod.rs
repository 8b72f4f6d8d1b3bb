//! Ingestion of new works into library-shaped entries.
//!
//! The ingest list names works by type and title. Each is looked up in a
//! public metadata API and turned into a draft entry with placeholder
//! curator texts. Drafts are written to a separate file for review; merging
//! them into the master library and producing the cover images is left to
//! the curator.
//!
//! ```text
//! ingest.txt → parse → lookup (Google Books / iTunes) → new_entries.json
//! ```

pub mod request;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use regex::Regex;
use tokio::fs;
use tracing::{info, warn};

use crate::adapters::{MetadataLookup, WorkMetadata};
use crate::core::render::write_artifact;
use crate::domain::{Category, LibraryItem};

pub use request::{parse_line, parse_requests, IngestRequest, ParsedLine};

/// Characters of the description kept in the draft review
const REVIEW_EXCERPT_CHARS: usize = 100;

fn non_alphanumeric() -> &'static Regex {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"))
}

/// File-name safe slug of a title
pub fn slugify(title: &str) -> String {
    non_alphanumeric()
        .replace_all(&title.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Draft library entry for a looked-up work
pub fn draft_entry(meta: &WorkMetadata, id: String) -> LibraryItem {
    let excerpt: String = meta.description.chars().take(REVIEW_EXCERPT_CHARS).collect();
    let tag = meta.genre.clone().unwrap_or_else(|| "Classic".to_string());

    let mut item = LibraryItem::new(
        id,
        meta.title.clone(),
        format!("{}, {}", meta.creator, meta.year),
        format!("images/{}.png", slugify(&meta.title)),
    )
    .with_tags([tag, "global".to_string(), "art".to_string()])
    .with_default_context(format!("\"{}\"", meta.title));

    item.technician_review = format!("Automatically ingested. {}...", excerpt);
    item.soul_note = "To be written by the curator.".to_string();
    item.significance = "A masterpiece from the global archive.".to_string();
    item.artist_fact = "To be added.".to_string();
    item
}

/// Draft id: category initial, unix seconds and a random suffix
pub fn draft_id<R: Rng + ?Sized>(category: Category, unix_secs: i64, rng: &mut R) -> String {
    let initial = category.as_str().chars().next().unwrap_or('x');
    format!("{}_{}_{}", initial, unix_secs, rng.random_range(100..=999))
}

/// Outcome of an ingest session
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub requested: usize,
    pub found: usize,
    pub missing: Vec<String>,
}

/// Looks up works and writes draft entries
pub struct Ingestor {
    lookup: Box<dyn MetadataLookup>,
    request_delay: Duration,
}

impl Ingestor {
    pub fn new(lookup: Box<dyn MetadataLookup>, request_delay: Duration) -> Self {
        Self {
            lookup,
            request_delay,
        }
    }

    /// Look up every request, returning drafts grouped by category
    pub async fn draft_entries<R: Rng + ?Sized>(
        &self,
        requests: &[IngestRequest],
        rng: &mut R,
    ) -> (BTreeMap<Category, Vec<LibraryItem>>, IngestSummary) {
        let mut entries: BTreeMap<Category, Vec<LibraryItem>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        let mut summary = IngestSummary {
            requested: requests.len(),
            ..Default::default()
        };

        for (i, request) in requests.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            info!("Fetching metadata for [{}]: {}", request.category, request.query);
            match self.lookup.lookup(request.category, &request.query).await {
                Ok(Some(meta)) => {
                    let id = draft_id(request.category, Utc::now().timestamp(), rng);
                    info!("  -> Found: {} ({})", meta.title, meta.year);
                    entries
                        .entry(request.category)
                        .or_default()
                        .push(draft_entry(&meta, id));
                    summary.found += 1;
                }
                Ok(None) => {
                    warn!("  -> No metadata found for '{}'", request.query);
                    summary.missing.push(request.query.clone());
                }
                Err(e) => {
                    warn!("  -> Lookup failed for '{}': {:#}", request.query, e);
                    summary.missing.push(request.query.clone());
                }
            }
        }

        (entries, summary)
    }

    /// Process an ingest list into a drafts file
    pub async fn run<R: Rng + ?Sized>(
        &self,
        input: &Path,
        output: &Path,
        rng: &mut R,
    ) -> Result<IngestSummary> {
        let content = fs::read_to_string(input)
            .await
            .with_context(|| format!("Ingest list not found: {}", input.display()))?;

        let requests = parse_requests(&content);
        info!("Processing {} item(s)", requests.len());

        let (entries, summary) = self.draft_entries(&requests, rng).await;

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize drafts")?;
        write_artifact(output, json).await?;
        info!("Ingestion complete, drafts written to {}", output.display());

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    struct Catalogue;

    #[async_trait]
    impl MetadataLookup for Catalogue {
        async fn lookup(&self, category: Category, query: &str) -> Result<Option<WorkMetadata>> {
            match query {
                "fail" => anyhow::bail!("service down"),
                "unknown" => Ok(None),
                _ => Ok(Some(WorkMetadata {
                    title: query.to_string(),
                    creator: format!("{} maker", category),
                    year: "1959".to_string(),
                    description: "x".repeat(150),
                    genre: None,
                })),
            }
        }
    }

    fn meta(title: &str) -> WorkMetadata {
        WorkMetadata {
            title: title.to_string(),
            creator: "Miles Davis".to_string(),
            year: "1959".to_string(),
            description: "Modal jazz.".to_string(),
            genre: Some("Jazz".to_string()),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Kind of Blue"), "kind_of_blue");
        assert_eq!(slugify("  2001: A Space Odyssey!! "), "2001_a_space_odyssey");
        assert_eq!(slugify("Amélie"), "am_lie");
    }

    #[test]
    fn test_draft_entry_fields() {
        let item = draft_entry(&meta("Kind of Blue"), "m_1_100".to_string());

        assert_eq!(item.subtitle, "Miles Davis, 1959");
        assert_eq!(item.image, "images/kind_of_blue.png");
        assert_eq!(item.technician_review, "Automatically ingested. Modal jazz....");
        assert_eq!(item.default_context, "\"Kind of Blue\"");
        assert_eq!(item.tags, vec!["Jazz", "global", "art"]);
        assert_eq!(item.soul_note, "To be written by the curator.");
    }

    #[test]
    fn test_draft_id_shape() {
        let mut rng = StdRng::seed_from_u64(4);
        let id = draft_id(Category::Books, 1_700_000_000, &mut rng);
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts[0], "b");
        assert_eq!(parts[1], "1700000000");
        let suffix: u32 = parts[2].parse().unwrap();
        assert!((100..=999).contains(&suffix));
    }

    #[tokio::test]
    async fn test_run_writes_drafts_and_reports_misses() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("ingest.txt");
        let output = temp.path().join("new_entries.json");
        std::fs::write(&input, "# list\nbook: Dune\nalbum: unknown\nmovie: fail\nuntyped\n").unwrap();

        let ingestor = Ingestor::new(Box::new(Catalogue), Duration::ZERO);
        let summary = ingestor
            .run(&input, &output, &mut StdRng::seed_from_u64(8))
            .await
            .unwrap();

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.found, 1);
        assert_eq!(summary.missing, vec!["unknown", "fail"]);

        let drafts: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(drafts["books"][0]["title"], "Dune");
        assert_eq!(drafts["books"][0]["tags"][0], "Classic");
        assert_eq!(drafts["movies"].as_array().unwrap().len(), 0);
        assert_eq!(drafts["music"].as_array().unwrap().len(), 0);
        let review = drafts["books"][0]["technicianReview"].as_str().unwrap();
        assert_eq!(review.len(), "Automatically ingested. ".len() + 100 + 3);
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let temp = TempDir::new().unwrap();
        let ingestor = Ingestor::new(Box::new(Catalogue), Duration::ZERO);

        let result = ingestor
            .run(
                &temp.path().join("ingest.txt"),
                &temp.path().join("out.json"),
                &mut StdRng::seed_from_u64(8),
            )
            .await;
        assert!(result.is_err());
    }
}
