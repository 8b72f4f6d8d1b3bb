//! Master library store.
//!
//! The library is a single JSON document keyed by category, each an ordered
//! array of items. It is read once per run and never written by the curator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::domain::{Category, LibraryItem};

/// Errors that can occur loading the library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Library not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed library {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate id '{id}' in {category}")]
    DuplicateId { category: Category, id: String },
}

/// Items of every category, in store order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    categories: BTreeMap<Category, Vec<LibraryItem>>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the library from disk
    pub async fn load(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            return Err(LibraryError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| LibraryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let library = Self::from_json(&content).map_err(|err| match err {
            LibraryError::Parse { source, .. } => LibraryError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        for category in Category::ALL {
            if !library.categories.contains_key(&category) {
                tracing::warn!("Library has no '{}' section, treating it as empty", category);
            }
            let untagged = library
                .items(category)
                .iter()
                .filter(|i| i.tags.is_empty())
                .count();
            if untagged > 0 {
                tracing::warn!("{} {} item(s) have no tags and will always score 0", untagged, category);
            }
        }

        Ok(library)
    }

    /// Parse a library document
    pub fn from_json(content: &str) -> Result<Self, LibraryError> {
        let library: Self = serde_json::from_str(content).map_err(|source| LibraryError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        library.validate()?;
        Ok(library)
    }

    /// Check that ids are unique within each category
    fn validate(&self) -> Result<(), LibraryError> {
        for (category, items) in &self.categories {
            for (i, item) in items.iter().enumerate() {
                if items[..i].iter().any(|other| other.id == item.id) {
                    return Err(LibraryError::DuplicateId {
                        category: *category,
                        id: item.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Items of a category, empty if the store has none
    pub fn items(&self, category: Category) -> &[LibraryItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append an item to a category
    pub fn add(&mut self, category: Category, item: LibraryItem) {
        self.categories.entry(category).or_default().push(item);
    }

    /// Total number of items across categories
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
