//! Library items and the categories they belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content category of the library
///
/// Variant order is the canonical order categories are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Films
    Movies,

    /// Albums
    Music,

    /// Literature
    Books,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 3] = [Category::Movies, Category::Music, Category::Books];

    /// Key used in the library store and the rendered artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movies => "movies",
            Category::Music => "music",
            Category::Books => "books",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(Category::Movies),
            "music" | "album" | "song" => Ok(Category::Music),
            "book" | "books" => Ok(Category::Books),
            _ => anyhow::bail!("Unknown category: {}", s),
        }
    }
}

/// A single entry of the master library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    /// Stable identifier, unique within its category
    pub id: String,

    pub title: String,

    /// Creator and year, e.g. "Akira Kurosawa, 1954"
    pub subtitle: String,

    /// Relative path of the cover image
    pub image: String,

    #[serde(default)]
    pub technician_review: String,

    #[serde(default)]
    pub soul_note: String,

    #[serde(default)]
    pub significance: String,

    /// Quote shown on the card when the item is selected
    #[serde(default)]
    pub default_context: String,

    #[serde(default)]
    pub artist_fact: String,

    /// Mood affinity tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Any further fields in the store, carried through to the artifact
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LibraryItem {
    /// Create an item with the required fields and empty texts
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            image: image.into(),
            technician_review: String::new(),
            soul_note: String::new(),
            significance: String::new(),
            default_context: String::new(),
            artist_fact: String::new(),
            tags: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set the mood tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default context quote
    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = context.into();
        self
    }

    /// Check whether the item carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
