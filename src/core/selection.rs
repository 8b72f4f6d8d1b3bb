//! Freshness-aware scoring and selection of the daily edition.
//!
//! For each category the items are shuffled, split into fresh and stale
//! (shown by the previous edition), each half is stably ranked by mood
//! score, and the fresh half always precedes the stale half. The first
//! [`EDITION_SIZE`] survivors are laid out by rank.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Category, Edition, EditionEntry, LibraryItem, Mood, EDITION_SIZE};
use crate::library::Library;

/// Points awarded per tag shared with the mood
pub const TAG_WEIGHT: u32 = 2;

/// Mood score of an item: `TAG_WEIGHT` per overlapping tag
pub fn score(item: &LibraryItem, mood: Mood) -> u32 {
    let overlap = mood.tags().iter().filter(|tag| item.has_tag(tag)).count() as u32;
    overlap * TAG_WEIGHT
}

/// Rank one category's items for the given mood
///
/// The shuffle is the tie-breaker between equally scored items within the
/// same freshness partition.
pub fn rank_items<R: Rng + ?Sized>(
    items: &[LibraryItem],
    mood: Mood,
    excluded_ids: &HashSet<String>,
    rng: &mut R,
) -> Vec<LibraryItem> {
    let mut pool = items.to_vec();
    pool.shuffle(rng);

    let (mut fresh, mut stale): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .partition(|item| !excluded_ids.contains(&item.id));

    // sort_by_key is stable, so shuffled order survives among equal scores
    fresh.sort_by_key(|item| std::cmp::Reverse(score(item, mood)));
    stale.sort_by_key(|item| std::cmp::Reverse(score(item, mood)));

    fresh.extend(stale);
    fresh
}

/// Select the ranked, laid-out entries of one category
pub fn select_category<R: Rng + ?Sized>(
    items: &[LibraryItem],
    mood: Mood,
    excluded_ids: &HashSet<String>,
    rng: &mut R,
) -> Vec<EditionEntry> {
    rank_items(items, mood, excluded_ids, rng)
        .into_iter()
        .take(EDITION_SIZE)
        .enumerate()
        .filter_map(|(rank, item)| EditionEntry::at_rank(item, rank))
        .collect()
}

/// Select the daily edition from the library
///
/// The library itself is not modified; every category is ranked on a copy.
pub fn select_edition<R: Rng + ?Sized>(
    library: &Library,
    mood: Mood,
    excluded_ids: &HashSet<String>,
    rng: &mut R,
) -> Edition {
    let mut edition = Edition::new();

    for category in Category::ALL {
        let entries = select_category(library.items(category), mood, excluded_ids, rng);
        tracing::debug!(
            "{}: selected {:?}",
            category,
            entries.iter().map(EditionEntry::id).collect::<Vec<_>>()
        );
        edition.insert(category, entries);
    }

    edition
}
