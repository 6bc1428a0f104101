use core::fmt;

use serde::{Deserialize, Serialize};

/// Printed rarity of a card that can be opened from a booster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
    ];

    /// Parses the lowercase wire value. Anything else ("special", "bonus", "") is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "mythic" => Some(Rarity::Mythic),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics bucket a distinct card is counted in.
///
/// `CommonLand` only exists for set statistics; no card carries it as a rarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityBucket {
    CommonLand,
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl RarityBucket {
    pub const ALL: [RarityBucket; 5] = [
        RarityBucket::CommonLand,
        RarityBucket::Common,
        RarityBucket::Uncommon,
        RarityBucket::Rare,
        RarityBucket::Mythic,
    ];

    /// Buckets a card, moving commons whose type line starts with "Basic Land" or "Land"
    /// into `CommonLand`.
    pub fn classify(rarity: Rarity, type_line: Option<&str>) -> Self {
        match rarity {
            Rarity::Common if type_line.is_some_and(is_land_type_line) => RarityBucket::CommonLand,
            Rarity::Common => RarityBucket::Common,
            Rarity::Uncommon => RarityBucket::Uncommon,
            Rarity::Rare => RarityBucket::Rare,
            Rarity::Mythic => RarityBucket::Mythic,
        }
    }
}

fn is_land_type_line(type_line: &str) -> bool {
    type_line.starts_with("Basic Land") || type_line.starts_with("Land")
}
