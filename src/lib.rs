//! anima - news-driven daily art curator
//!
//! Reads the day's top headline, maps it to one of five moods, and picks
//! five films, albums and books from a curated library that fit the mood.
//! The edition is published as a JavaScript data file for a static site.
//!
//! # Architecture
//!
//! Each run is stateless apart from the published artifact:
//! - The artifact records the ids it shows, so the next run can avoid them
//! - Shown items are deprioritized, never removed from the pool
//! - The artifact is replaced atomically, readers never see a partial file
//!
//! # Modules
//!
//! - `adapters`: External services (GNews headlines, Google Books, iTunes)
//! - `core`: Curation logic (classifier, freshness, selection, render)
//! - `domain`: Data structures (LibraryItem, Mood, Edition)
//! - `library`: Master library loading and validation
//! - `marketing`: SEO tags, RSS feed and social copy per edition
//! - `scheduler`: Periodic curation in child processes
//! - `ingest`: Draft library entries from metadata lookups
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Curate today's edition
//! anima curate
//!
//! # Reproducible run with a fixed headline
//! anima curate --headline "New AI model released" --seed 42
//!
//! # Curate every 30 seconds
//! anima schedule
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ingest;
pub mod library;
pub mod marketing;
pub mod scheduler;

// Re-export main types at crate root for convenience
pub use config::Settings;
pub use core::{classify, CurationReport, Curator, HeadlineOrigin};
pub use domain::{Category, Edition, EditionEntry, Layout, LibraryItem, Mood};
pub use library::{Library, LibraryError};
