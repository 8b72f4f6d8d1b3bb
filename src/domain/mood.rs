//! Mood categories and their tag affinities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mood inferred from the day's headline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "Conflict")]
    Conflict,

    #[serde(rename = "Tech/Future")]
    TechFuture,

    #[serde(rename = "Romance/Melancholy")]
    RomanceMelancholy,

    #[serde(rename = "Spiritual/Deep")]
    SpiritualDeep,

    #[serde(rename = "Social/Justice")]
    SocialJustice,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Conflict,
        Mood::TechFuture,
        Mood::RomanceMelancholy,
        Mood::SpiritualDeep,
        Mood::SocialJustice,
    ];

    /// Library tags this mood has affinity with
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Mood::Conflict => &["war", "chaos", "politics", "survival", "history"],
            Mood::TechFuture => &["technology", "future", "nature", "science", "dune"],
            Mood::RomanceMelancholy => &["love", "romance", "memory", "nostalgia", "heartbreak"],
            Mood::SpiritualDeep => &["spirituality", "meditation", "divine", "gratitude", "poetry"],
            Mood::SocialJustice => &["class", "inequality", "society", "justice", "truth"],
        }
    }

    /// Display name used in the artifact, the feed and social copy
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Conflict => "Conflict",
            Mood::TechFuture => "Tech/Future",
            Mood::RomanceMelancholy => "Romance/Melancholy",
            Mood::SpiritualDeep => "Spiritual/Deep",
            Mood::SocialJustice => "Social/Justice",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Unknown mood: {}", s))
    }
}
