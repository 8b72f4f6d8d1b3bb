//! The daily edition produced by a curation run.
//!
//! An edition only lives for the run that created it: the layout and daily
//! context of each entry are recomputed every time and never written back
//! to the library.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::item::{Category, LibraryItem};

/// Number of entries selected per category
pub const EDITION_SIZE: usize = 5;

/// Visual slot of an entry in the front-end grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Featured,
    Tall,
    Wide,
    Regular,
}

impl Layout {
    /// Layout pattern by rank position
    pub const PATTERN: [Layout; EDITION_SIZE] = [
        Layout::Featured,
        Layout::Tall,
        Layout::Wide,
        Layout::Regular,
        Layout::Regular,
    ];

    /// Layout for a rank position, `None` past the edition size
    pub fn for_rank(rank: usize) -> Option<Layout> {
        Self::PATTERN.get(rank).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Featured => "featured",
            Layout::Tall => "tall",
            Layout::Wide => "wide",
            Layout::Regular => "regular",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected library item with its run-scoped presentation fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionEntry {
    #[serde(flatten)]
    pub item: LibraryItem,

    pub layout: Layout,

    /// Context quote for today, copied from the item's default context
    pub daily_context: String,
}

impl EditionEntry {
    /// Place an item at a rank, returns `None` past the edition size
    pub fn at_rank(item: LibraryItem, rank: usize) -> Option<Self> {
        let layout = Layout::for_rank(rank)?;
        let daily_context = item.default_context.clone();
        Some(Self {
            item,
            layout,
            daily_context,
        })
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Selected entries per category, in rank order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edition {
    categories: BTreeMap<Category, Vec<EditionEntry>>,
}

impl Edition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ranked entries of a category
    pub fn insert(&mut self, category: Category, entries: Vec<EditionEntry>) {
        self.categories.insert(category, entries);
    }

    /// Entries of a category, empty if none were selected
    pub fn entries(&self, category: Category) -> &[EditionEntry] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Top ranked entry of a category
    pub fn lead(&self, category: Category) -> Option<&EditionEntry> {
        self.entries(category).first()
    }

    /// Categories with their entries, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[EditionEntry])> {
        self.categories.iter().map(|(c, e)| (*c, e.as_slice()))
    }

    /// Ids of every selected entry across categories
    pub fn ids(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flatten()
            .map(|e| e.item.id.clone())
            .collect()
    }

    /// Total number of selected entries
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
