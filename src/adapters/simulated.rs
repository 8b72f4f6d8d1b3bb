//! Offline headline fallback.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Canned headlines used when no live source is reachable
pub const SIMULATED_HEADLINES: [&str; 4] = [
    "Massive AI breakthrough changes how we write code",
    "Tensions rise in the border regions as peace talks fail",
    "A quiet day of reflection and meditation across the globe",
    "Protests erupt over wealth inequality in major capitals",
];

/// Pick a simulated headline
pub fn simulated_headline<R: Rng + ?Sized>(rng: &mut R) -> String {
    SIMULATED_HEADLINES
        .choose(rng)
        .copied()
        .unwrap_or(SIMULATED_HEADLINES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;
    use crate::domain::Mood;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulated_headline_is_canned() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let headline = simulated_headline(&mut rng);
            assert!(SIMULATED_HEADLINES.contains(&headline.as_str()));
        }
    }

    #[test]
    fn test_canned_headlines_cover_distinct_moods() {
        let moods: Vec<Mood> = SIMULATED_HEADLINES.iter().map(|h| classify(h)).collect();
        assert_eq!(
            moods,
            vec![Mood::TechFuture, Mood::Conflict, Mood::SpiritualDeep, Mood::SocialJustice]
        );
    }
}
