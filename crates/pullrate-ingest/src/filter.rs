use serde::Serialize;

use pullrate_core::Rarity;

use crate::raw::{RawCardRecord, non_empty};

/// Layouts that never appear as booster cards.
pub const EXCLUDED_LAYOUTS: [&str; 7] = [
    "token",
    "double_faced_token",
    "emblem",
    "art_series",
    "scheme",
    "vanguard",
    "planar",
];

/// Why a raw record was left out of every artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Array element that is not a card object of the expected field types.
    Malformed,
    Language,
    Digital,
    NotInBoosters,
    ExcludedLayout,
    Rarity,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            SkipReason::Malformed => "malformed",
            SkipReason::Language => "language",
            SkipReason::Digital => "digital",
            SkipReason::NotInBoosters => "not_in_boosters",
            SkipReason::ExcludedLayout => "excluded_layout",
            SkipReason::Rarity => "rarity",
        }
    }
}

/// A record that passed the filter, with the values the filter already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeptCard<'a> {
    pub id: Option<&'a str>,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFilter {
    language: String,
}

impl CardFilter {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn evaluate<'a>(&self, raw: &'a RawCardRecord) -> Result<KeptCard<'a>, SkipReason> {
        if raw.lang.as_deref() != Some(self.language.as_str()) {
            return Err(SkipReason::Language);
        }
        if raw.digital == Some(true) {
            return Err(SkipReason::Digital);
        }
        // An absent flag counts as available in boosters.
        if raw.booster == Some(false) {
            return Err(SkipReason::NotInBoosters);
        }
        if raw
            .layout
            .as_deref()
            .is_some_and(|layout| EXCLUDED_LAYOUTS.contains(&layout))
        {
            return Err(SkipReason::ExcludedLayout);
        }
        let rarity = raw
            .rarity
            .as_deref()
            .and_then(Rarity::parse)
            .ok_or(SkipReason::Rarity)?;

        Ok(KeptCard {
            id: non_empty(raw.id.as_deref()),
            rarity,
        })
    }
}
