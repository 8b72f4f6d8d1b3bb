//! Keyword heuristic mapping a headline to a mood.
//!
//! Groups are tested in a fixed priority order and matched by plain
//! substring containment on the lower-cased headline, so a headline that
//! mentions both a war and an AI launch resolves to `Conflict`.

use crate::domain::Mood;

/// Keyword groups in priority order. Headlines matching none fall back to
/// [`Mood::SpiritualDeep`].
const KEYWORD_GROUPS: [(Mood, &[&str]); 4] = [
    (Mood::Conflict, &["war", "attack", "crisis", "tension", "army"]),
    (Mood::TechFuture, &["ai", "tech", "space", "launch", "robot", "climate"]),
    (Mood::RomanceMelancholy, &["love", "marriage", "divorce", "valentine", "heart"]),
    (Mood::SocialJustice, &["protest", "strike", "law", "court", "scandal"]),
];

/// Mood used when no keyword group matches
pub const DEFAULT_MOOD: Mood = Mood::SpiritualDeep;

/// Classify a headline into a mood
pub fn classify(headline: &str) -> Mood {
    let lower = headline.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(mood, _)| *mood)
        .unwrap_or(DEFAULT_MOOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_wins_over_tech() {
        assert_eq!(classify("AI breakthrough amid rising war tensions"), Mood::Conflict);
        assert_eq!(classify("Army deploys robot scouts"), Mood::Conflict);
    }

    #[test]
    fn test_each_group() {
        assert_eq!(classify("Rocket LAUNCH scheduled for Friday"), Mood::TechFuture);
        assert_eq!(classify("Royal marriage announced"), Mood::RomanceMelancholy);
        assert_eq!(classify("Supreme Court hears appeal"), Mood::SocialJustice);
    }

    #[test]
    fn test_fallback_to_spiritual() {
        assert_eq!(classify("A quiet morning of reflection"), Mood::SpiritualDeep);
        assert_eq!(classify(""), Mood::SpiritualDeep);
    }

    #[test]
    fn test_substring_containment() {
        // "said" contains "ai"
        assert_eq!(classify("Mayor said nothing"), Mood::TechFuture);
        // "software" contains "war"
        assert_eq!(classify("New software release"), Mood::Conflict);
    }

    #[test]
    fn test_romance_before_social() {
        assert_eq!(classify("Divorce law reform"), Mood::RomanceMelancholy);
    }
}
