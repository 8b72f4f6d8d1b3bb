//! Open Graph and Twitter card tags of the site's index page.

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use tokio::fs;

use super::{escape_markup, Campaign, Marketer};
use crate::core::render::write_artifact;
use crate::domain::Category;

/// Preview texts for the day's edition
#[derive(Debug, Clone, PartialEq)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub image: String,
}

impl MetaTags {
    pub fn for_campaign(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<Self> {
        let movie = campaign.lead(Category::Movies)?;
        let music = campaign.lead(Category::Music)?;
        let book = campaign.lead(Category::Books)?;

        Ok(Self {
            title: format!("ANIMA | Daily Art Curation: {}", campaign.date()),
            description: format!(
                "Today's Mood: {}. Featuring {}, {}, and {}.",
                campaign.mood, movie.item.title, music.item.title, book.item.title
            ),
            image: marketer.absolute_url(&movie.item.image),
        })
    }
}

/// Replace the `content` of one meta tag; tags absent from the page are left alone
fn set_meta(html: &str, attr: &str, name: &str, value: &str) -> Result<String> {
    let pattern = format!(
        r#"<meta {}="{}" content="[^"]*""#,
        regex::escape(attr),
        regex::escape(name)
    );
    let re = Regex::new(&pattern).context("Invalid meta tag pattern")?;
    let replacement = format!(r#"<meta {}="{}" content="{}""#, attr, name, escape_markup(value));
    Ok(re.replace_all(html, NoExpand(&replacement)).into_owned())
}

/// Rewrite the social preview tags of a page
pub fn apply_meta_tags(html: &str, tags: &MetaTags) -> Result<String> {
    let mut html = html.to_string();
    for (attr, prefix) in [("property", "og"), ("name", "twitter")] {
        html = set_meta(&html, attr, &format!("{}:title", prefix), &tags.title)?;
        html = set_meta(&html, attr, &format!("{}:description", prefix), &tags.description)?;
        html = set_meta(&html, attr, &format!("{}:image", prefix), &tags.image)?;
    }
    Ok(html)
}

/// Update the site's index page for the campaign
pub async fn update_meta_tags(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<()> {
    let tags = MetaTags::for_campaign(marketer, campaign)?;
    let path = &marketer.site().html_file;

    let html = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read site page: {}", path.display()))?;

    let updated = apply_meta_tags(&html, &tags)?;
    write_artifact(path, updated).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::Mood;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head>
<meta property="og:title" content="old title">
<meta property="og:description" content="old description">
<meta property="og:image" content="">
<meta name="twitter:title" content="old title">
<meta name="twitter:description" content="old">
<meta name="twitter:image" content="old.png">
</head></html>"#;

    #[test]
    fn test_meta_tags_for_campaign() {
        let temp = TempDir::new().unwrap();
        let marketer = Marketer::new(site(temp.path()));
        let edition = edition();
        let campaign = Campaign {
            edition: &edition,
            mood: Mood::TechFuture,
            headline: "Launch",
            now: now(),
        };

        let tags = MetaTags::for_campaign(&marketer, &campaign).unwrap();
        assert_eq!(tags.title, "ANIMA | Daily Art Curation: 2026-01-13");
        assert_eq!(
            tags.description,
            "Today's Mood: Tech/Future. Featuring Seven Samurai, Kind of Blue, and The Stranger."
        );
        assert_eq!(tags.image, "https://example.org/muse/images/m1.png");
    }

    #[test]
    fn test_apply_meta_tags_escapes_and_ignores_dollar_signs() {
        let tags = MetaTags {
            title: "A $1 \"deal\"".to_string(),
            description: "desc".to_string(),
            image: "https://example.org/a.png".to_string(),
        };

        let html = apply_meta_tags(PAGE, &tags).unwrap();
        assert!(html.contains(r#"<meta property="og:title" content="A $1 &quot;deal&quot;">"#));
        assert!(html.contains(r#"<meta name="twitter:description" content="desc">"#));
        assert!(html.contains(r#"<meta property="og:image" content="https://example.org/a.png">"#));
        assert!(!html.contains("old"));
    }

    #[tokio::test]
    async fn test_update_meta_tags_rewrites_page() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("index.html"), PAGE).unwrap();
        let marketer = Marketer::new(site(temp.path()));
        let edition = edition();
        let campaign = Campaign {
            edition: &edition,
            mood: Mood::Conflict,
            headline: "War",
            now: now(),
        };

        update_meta_tags(&marketer, &campaign).await.unwrap();

        let html = std::fs::read_to_string(temp.path().join("index.html")).unwrap();
        assert!(html.contains("Today&#39;s Mood: Conflict."));
        assert!(html.contains(r#"<meta name="twitter:image" content="https://example.org/muse/images/m1.png">"#));
    }
}
