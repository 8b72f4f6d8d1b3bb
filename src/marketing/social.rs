//! Copy-paste social media drafts for the day's edition.

use anyhow::Result;

use super::{Campaign, Marketer};
use crate::core::render::write_artifact;
use crate::domain::Category;

/// Draft posts for the campaign
pub fn social_copy(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<String> {
    let movie = campaign.lead(Category::Movies)?;
    let music = campaign.lead(Category::Music)?;
    let book = campaign.lead(Category::Books)?;

    let site = &marketer.site().url;
    let mood = campaign.mood;
    let music_by = if music.item.subtitle.is_empty() {
        "Unknown"
    } else {
        music.item.subtitle.as_str()
    };

    Ok(format!(
        r#"
--- SOCIAL SHARE FOR {date} ---

[TWITTER / BLUESKY]
Today's Mood: {mood} 🌑

Featuring:
🎥 {movie} ({movie_sub})
💿 {music}
📖 {book}

Curated by the ANIMA Engine.
{site}

[REDDIT - r/TrueFilm or r/ArtHistory]
Title: Daily Art Curation: {movie} and the theme of {mood}
Body:
Today's edition of ANIMA pairs {movie} with the music of {music_by}.
The common thread is "{mood}" - responding to the headline: "{headline}".
Check it out here: {site}

---------------------------------
"#,
        date = campaign.now.format("%b %d"),
        mood = mood,
        movie = movie.item.title,
        movie_sub = movie.item.subtitle,
        music = music.item.title,
        book = book.item.title,
        site = site,
        music_by = music_by,
        headline = campaign.headline,
    ))
}

/// Overwrite the share file with today's drafts
pub async fn write_social_copy(marketer: &Marketer, campaign: &Campaign<'_>) -> Result<()> {
    let copy = social_copy(marketer, campaign)?;
    write_artifact(&marketer.site().social_file, copy).await?;
    Ok(())
}
