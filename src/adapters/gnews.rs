//! GNews top-headlines adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{HeadlineError, HeadlineSource};

/// Default GNews API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://gnews.io/api/v4/top-headlines";

/// Number of headlines requested per call
const MAX_ARTICLES: u32 = 5;

/// GNews API client
pub struct GNewsClient {
    /// API key, the source is unavailable without one
    api_key: Option<String>,
    /// Top-headlines endpoint
    endpoint: String,
    /// Per-request timeout
    timeout: Duration,
    /// HTTP client
    client: reqwest::Client,
}

/// Response from the top-headlines endpoint
#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

impl GNewsClient {
    /// Create a new client
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Use a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Query parameters for a top-headlines request
    fn query(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("category", "general".to_string()),
            ("lang", "en".to_string()),
            ("max", MAX_ARTICLES.to_string()),
            ("apikey", api_key.to_string()),
        ]
    }
}

/// Non-empty titles of a top-headlines response
fn titles(response: TopHeadlinesResponse) -> Result<Vec<String>, HeadlineError> {
    if let Some(errors) = response.errors {
        return Err(HeadlineError::Api(errors.to_string()));
    }

    let titles: Vec<String> = response
        .articles
        .into_iter()
        .filter_map(|a| a.title)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if titles.is_empty() {
        return Err(HeadlineError::Empty);
    }
    Ok(titles)
}

#[async_trait]
impl HeadlineSource for GNewsClient {
    fn name(&self) -> &str {
        "gnews"
    }

    async fn fetch_headlines(&self) -> Result<Vec<String>, HeadlineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HeadlineError::NotConfigured("GNEWS_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query(api_key))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HeadlineError::Api(format!("HTTP {}", status)));
        }

        let body: TopHeadlinesResponse = response.json().await?;
        titles(body)
    }
}
