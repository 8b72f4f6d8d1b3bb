//! Metadata lookups for new library entries.
//!
//! Books come from the Google Books volumes API, films and albums from the
//! iTunes Search API. Each lookup returns the single best match.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Category;

/// Google Books volumes endpoint
pub const GOOGLE_BOOKS_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// iTunes Search endpoint
pub const ITUNES_ENDPOINT: &str = "https://itunes.apple.com/search";

/// Metadata of a work found by a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct WorkMetadata {
    pub title: String,
    /// Author, artist or director
    pub creator: String,
    /// Four-digit year, may be empty
    pub year: String,
    pub description: String,
    /// Primary genre or subject, if known
    pub genre: Option<String>,
}

/// First four characters of a date string
fn year_of(date: &str) -> String {
    date.chars().take(4).collect()
}

// ============================================================================
// Google Books
// ============================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    published_date: String,
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
}

impl From<VolumeInfo> for WorkMetadata {
    fn from(info: VolumeInfo) -> Self {
        let creator = if info.authors.is_empty() {
            "Unknown".to_string()
        } else {
            info.authors.join(", ")
        };

        Self {
            title: info.title.unwrap_or_else(|| "Untitled".to_string()),
            creator,
            year: year_of(&info.published_date),
            description: info
                .description
                .unwrap_or_else(|| "No description available.".to_string()),
            genre: info.categories.into_iter().next(),
        }
    }
}

/// Google Books client
pub struct GoogleBooksClient {
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleBooksClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: GOOGLE_BOOKS_ENDPOINT.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }

    /// Best matching book for a query
    pub async fn lookup(&self, query: &str) -> Result<Option<WorkMetadata>> {
        let response: VolumesResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("maxResults", "1"), ("printType", "books")])
            .send()
            .await
            .with_context(|| format!("Google Books request failed for '{}'", query))?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse Google Books response")?;

        Ok(response.items.into_iter().next().map(|v| v.volume_info.into()))
    }
}

// ============================================================================
// iTunes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    result_count: u32,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    track_name: Option<String>,
    collection_name: Option<String>,
    artist_name: Option<String>,
    #[serde(default)]
    release_date: String,
    primary_genre_name: Option<String>,
    long_description: Option<String>,
    description: Option<String>,
}

impl From<SearchResult> for WorkMetadata {
    fn from(result: SearchResult) -> Self {
        let creator = result.artist_name.unwrap_or_else(|| "Unknown".to_string());
        let description = result
            .long_description
            .or(result.description)
            .unwrap_or_else(|| {
                format!(
                    "A {} work by {}.",
                    result.primary_genre_name.as_deref().unwrap_or("timeless"),
                    creator
                )
            });

        Self {
            title: result
                .track_name
                .or(result.collection_name)
                .unwrap_or_else(|| "Untitled".to_string()),
            creator,
            year: year_of(&result.release_date),
            description,
            genre: result.primary_genre_name,
        }
    }
}

/// iTunes Search client for films and albums
pub struct ItunesClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ItunesClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: ITUNES_ENDPOINT.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }

    /// `media` and `entity` search parameters for a category
    fn media_entity(category: Category) -> (&'static str, &'static str) {
        match category {
            Category::Music => ("music", "album"),
            _ => ("movie", "movie"),
        }
    }

    /// Best matching film or album for a query
    pub async fn lookup(&self, query: &str, category: Category) -> Result<Option<WorkMetadata>> {
        let (media, entity) = Self::media_entity(category);

        let response: SearchResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("term", query), ("media", media), ("entity", entity), ("limit", "1")])
            .send()
            .await
            .with_context(|| format!("iTunes request failed for '{}'", query))?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse iTunes response")?;

        if response.result_count == 0 {
            return Ok(None);
        }
        Ok(response.results.into_iter().next().map(Into::into))
    }
}

// ============================================================================
// Combined lookup
// ============================================================================

/// Finds metadata for a work of any category
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup(&self, category: Category, query: &str) -> Result<Option<WorkMetadata>>;
}

/// Google Books for books, iTunes for everything else
pub struct WebMetadataLookup {
    books: GoogleBooksClient,
    itunes: ItunesClient,
}

impl WebMetadataLookup {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            books: GoogleBooksClient::new(timeout)?,
            itunes: ItunesClient::new(timeout)?,
        })
    }
}

#[async_trait]
impl MetadataLookup for WebMetadataLookup {
    async fn lookup(&self, category: Category, query: &str) -> Result<Option<WorkMetadata>> {
        match category {
            Category::Books => self.books.lookup(query).await,
            Category::Movies | Category::Music => self.itunes.lookup(query, category).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_info_conversion() {
        let response: VolumesResponse = serde_json::from_str(
            r#"{"items": [{"volumeInfo": {
                "title": "The Stranger",
                "authors": ["Albert Camus"],
                "publishedDate": "1942-05-19",
                "categories": ["Fiction"]
            }}]}"#,
        )
        .unwrap();

        let meta: WorkMetadata = response.items.into_iter().next().unwrap().volume_info.into();
        assert_eq!(meta.title, "The Stranger");
        assert_eq!(meta.creator, "Albert Camus");
        assert_eq!(meta.year, "1942");
        assert_eq!(meta.description, "No description available.");
        assert_eq!(meta.genre.as_deref(), Some("Fiction"));
    }

    #[test]
    fn test_itunes_result_conversion() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"resultCount": 1, "results": [{
                "collectionName": "Kind of Blue",
                "artistName": "Miles Davis",
                "releaseDate": "1959-08-17T07:00:00Z",
                "primaryGenreName": "Jazz"
            }]}"#,
        )
        .unwrap();

        let meta: WorkMetadata = response.results.into_iter().next().unwrap().into();
        assert_eq!(meta.title, "Kind of Blue");
        assert_eq!(meta.creator, "Miles Davis");
        assert_eq!(meta.year, "1959");
        assert_eq!(meta.description, "A Jazz work by Miles Davis.");
    }

    #[test]
    fn test_media_entity_per_category() {
        assert_eq!(ItunesClient::media_entity(Category::Music), ("music", "album"));
        assert_eq!(ItunesClient::media_entity(Category::Movies), ("movie", "movie"));
    }
}
