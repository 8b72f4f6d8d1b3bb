//! Core curation logic.
//!
//! This module contains:
//! - Classifier: Headline to mood heuristic
//! - Freshness: Ids shown by the previous edition
//! - Selection: Mood scoring and freshness-aware ranking
//! - Render: Front-end data file and atomic publishing
//! - Curator: Main run sequence

pub mod classifier;
pub mod curator;
pub mod freshness;
pub mod render;
pub mod selection;

// Re-export commonly used types
pub use classifier::classify;
pub use curator::{CurationReport, Curator, HeadlineOrigin};
pub use freshness::{excluded_ids, excluded_ids_from_path};
pub use render::{render, write_artifact};
pub use selection::{score, select_edition};
