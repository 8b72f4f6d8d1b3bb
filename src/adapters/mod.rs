//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the network services the
//! curator depends on: a headline source for the daily mood and metadata
//! lookups used when ingesting new library entries.

pub mod gnews;
pub mod metadata;
pub mod simulated;

use async_trait::async_trait;
use thiserror::Error;

pub use gnews::GNewsClient;
pub use metadata::{
    GoogleBooksClient, ItunesClient, MetadataLookup, WebMetadataLookup, WorkMetadata,
};
pub use simulated::{simulated_headline, SIMULATED_HEADLINES};

/// Errors from a headline source
#[derive(Debug, Error)]
pub enum HeadlineError {
    #[error("Headline source not configured: {0}")]
    NotConfigured(String),

    #[error("Headline request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Headline API error: {0}")]
    Api(String),

    #[error("Headline source returned no articles")]
    Empty,
}

/// A source of current news headlines
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch the current top headlines, most prominent first
    async fn fetch_headlines(&self) -> Result<Vec<String>, HeadlineError>;
}
