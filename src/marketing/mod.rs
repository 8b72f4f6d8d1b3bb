//! Marketing artifacts derived from each edition.
//!
//! After the edition is written, the marketer refreshes the site's social
//! preview tags, prepends an entry to the RSS feed and drafts social posts.
//! Every step is best-effort: a failure is logged and the remaining steps
//! still run. Nothing here can affect the rendered edition.

pub mod rss;
pub mod seo;
pub mod social;

use chrono::{DateTime, Utc};

use crate::config::SiteSettings;
use crate::domain::{Category, Edition, EditionEntry, Mood};

/// Everything a campaign needs to know about the run
#[derive(Debug, Clone, Copy)]
pub struct Campaign<'a> {
    pub edition: &'a Edition,
    pub mood: Mood,
    pub headline: &'a str,
    pub now: DateTime<Utc>,
}

impl<'a> Campaign<'a> {
    /// Lead entry of a category, or an error naming the empty category
    pub fn lead(&self, category: Category) -> anyhow::Result<&'a EditionEntry> {
        self.edition
            .lead(category)
            .ok_or_else(|| anyhow::anyhow!("Edition has no {} to feature", category))
    }

    /// ISO date of the campaign, e.g. 2026-01-13
    pub fn date(&self) -> String {
        self.now.format("%Y-%m-%d").to_string()
    }
}

/// Outcome of each campaign step
#[derive(Debug, Default)]
pub struct CampaignReport {
    pub completed: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl CampaignReport {
    fn record(&mut self, step: &'static str, result: anyhow::Result<()>) {
        match result {
            Ok(()) => {
                tracing::info!("Marketing: {} updated", step);
                self.completed.push(step);
            }
            Err(e) => {
                tracing::warn!("Marketing: {} failed (non-critical): {:#}", step, e);
                self.failed.push((step, format!("{:#}", e)));
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Publishes marketing artifacts for the public site
pub struct Marketer {
    site: SiteSettings,
}

impl Marketer {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    /// Absolute URL of a site-relative path
    pub fn absolute_url(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.site.url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }

    /// Run every campaign step, never failing as a whole
    pub async fn run_campaign(&self, campaign: &Campaign<'_>) -> CampaignReport {
        tracing::info!("Marketing campaign for {} ({})", campaign.date(), campaign.mood);
        let mut report = CampaignReport::default();

        report.record("seo", seo::update_meta_tags(self, campaign).await);
        report.record("rss", rss::update_feed(self, campaign).await);
        report.record("social", social::write_social_copy(self, campaign).await);

        report
    }
}

/// Escape text for HTML/XML content and attribute values
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
    }

    #[test]
    fn test_absolute_url_joins_once() {
        let temp = TempDir::new().unwrap();
        let marketer = Marketer::new(site(temp.path()));
        assert_eq!(
            marketer.absolute_url("/images/m1.png"),
            "https://example.org/muse/images/m1.png"
        );
    }

    #[tokio::test]
    async fn test_campaign_steps_fail_independently() {
        let temp = TempDir::new().unwrap();
        // No index.html: SEO fails, feed and social copy still get written
        let marketer = Marketer::new(site(temp.path()));
        let edition = edition();
        let campaign = Campaign {
            edition: &edition,
            mood: Mood::Conflict,
            headline: "Tensions rise",
            now: now(),
        };

        let report = marketer.run_campaign(&campaign).await;
        assert_eq!(report.completed, vec!["rss", "social"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "seo");
        assert!(!report.is_success());
        assert!(temp.path().join("feed.xml").exists());
        assert!(temp.path().join("daily_share.txt").exists());
    }

    #[tokio::test]
    async fn test_campaign_without_leads_fails_every_step() {
        let temp = TempDir::new().unwrap();
        let marketer = Marketer::new(site(temp.path()));
        let edition = Edition::new();
        let campaign = Campaign {
            edition: &edition,
            mood: Mood::SpiritualDeep,
            headline: "",
            now: now(),
        };

        let report = marketer.run_campaign(&campaign).await;
        assert!(report.completed.is_empty());
        assert_eq!(report.failed.len(), 3);
        assert!(!temp.path().join("daily_share.txt").exists());
    }
}
