//! RSS 2.0 feed with one item per edition, newest first.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use tokio::fs;

use super::{escape_markup, Campaign, Marketer};
use crate::core::render::write_artifact;
use crate::domain::Category;

const CHANNEL_TITLE: &str = "ANIMA | Daily Muse";
const CHANNEL_DESCRIPTION: &str = "Daily curated art, music, and cinema.";

fn last_build_date() -> &'static Regex {
    static LAST_BUILD: OnceLock<Regex> = OnceLock::new();
    LAST_BUILD.get_or_init(|| {
        Regex::new(r"(?s)<lastBuildDate>.*?</lastBuildDate>").expect("valid lastBuildDate pattern")
    })
}

/// RFC 2822 date in the form feed readers expect
fn rfc2822(campaign: &Campaign<'_>) -> String {
    campaign.now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Wrap markup in a CDATA section
fn cdata(markup: &str) -> String {
    format!("<![CDATA[{}]]>", markup.replace("]]>", "]]]]><![CDATA[>"))
}

/// Empty feed for the site
pub fn new_feed(marketer: &Marketer, campaign: &Campaign<'_>) -> String {
    let date = rfc2822(campaign);
    let link = escape_markup(&marketer.site().url);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
<channel>
 <title>{}</title>
 <description>{}</description>
 <link>{}</link>
 <lastBuildDate>{}</lastBuildDate>
 <pubDate>{}</pubDate>
</channel>
</rss>
"#,
        escape_markup(CHANNEL_TITLE),
        CHANNEL_DESCRIPTION,
        link,
        date,
        date
    )
}

/// Feed item announcing the campaign's edition
pub fn feed_item(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<String> {
    let movie = campaign.lead(Category::Movies)?;
    let music = campaign.lead(Category::Music)?;
    let book = campaign.lead(Category::Books)?;

    let site = &marketer.site().url;
    let date = campaign.date();
    let mood = escape_markup(campaign.mood.label());

    let description = format!(
        r#"<h3>Todays Mood: {mood}</h3>
<p>Inspired by: {headline}</p>
<hr/>
<p><strong>Cinema:</strong> {movie} ({movie_sub})<br/>
<em>{context}</em></p>
<img src="{image}" width="300"/>
<hr/>
<p><strong>Music:</strong> {music} ({music_sub})</p>
<hr/>
<p><strong>Literature:</strong> {book} ({book_sub})</p>
<p><a href="{site}">Visit ANIMA for the full experience.</a></p>"#,
        mood = mood,
        headline = escape_markup(campaign.headline),
        movie = escape_markup(&movie.item.title),
        movie_sub = escape_markup(&movie.item.subtitle),
        context = escape_markup(&movie.daily_context),
        image = escape_markup(&marketer.absolute_url(&movie.item.image)),
        music = escape_markup(&music.item.title),
        music_sub = escape_markup(&music.item.subtitle),
        book = escape_markup(&book.item.title),
        book_sub = escape_markup(&book.item.subtitle),
        site = escape_markup(site),
    );

    Ok(format!(
        r#"
    <item>
        <title>Edition {date}: {mood}</title>
        <link>{link}</link>
        <guid isPermaLink="false">{guid}</guid>
        <pubDate>{pub_date}</pubDate>
        <description>{description}</description>
    </item>
"#,
        date = date,
        mood = mood,
        link = escape_markup(site),
        guid = escape_markup(&marketer.absolute_url(&date)),
        pub_date = rfc2822(campaign),
        description = cdata(&description),
    ))
}

/// Insert an item ahead of existing items and refresh the build date
pub fn insert_item(feed: &str, item: &str, build_date: &str) -> Result<String> {
    let feed = last_build_date()
        .replace(feed, NoExpand(&format!("<lastBuildDate>{}</lastBuildDate>", build_date)))
        .into_owned();

    let at = feed
        .find("<item>")
        .map(|pos| {
            // step back over the indentation of the first item's line
            let indent = feed[..pos].trim_end_matches(|c: char| c == ' ' || c == '\t').len();
            if feed[..indent].ends_with('\n') {
                indent
            } else {
                pos
            }
        })
        .or_else(|| feed.find("</channel>"))
        .context("Feed has no <channel> element")?;

    let mut updated = String::with_capacity(feed.len() + item.len());
    updated.push_str(&feed[..at]);
    updated.push_str(item.trim_start_matches('\n'));
    updated.push_str(&feed[at..]);
    Ok(updated)
}

/// Prepend the campaign's item to the site feed, creating the feed if needed
pub async fn update_feed(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<()> {
    let item = feed_item(marketer, campaign)?;
    let path = &marketer.site().rss_file;

    let feed = match fs::read_to_string(path).await {
        Ok(feed) => feed,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("Creating feed {}", path.display());
            new_feed(marketer, campaign)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read feed: {}", path.display()));
        }
    };

    let updated = insert_item(&feed, &item, &rfc2822(campaign))?;
    write_artifact(path, updated).await?;
    Ok(())
}
