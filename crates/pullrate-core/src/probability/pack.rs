use crate::model::{Rarity, SetInfo};

/// One entry of the rare/mythic slot-count distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotWeight {
    pub slots: i32,
    pub probability: f64,
}

/// How many rare/mythic slots a play booster has. Weights sum to 1.
pub const RARE_SLOT_DISTRIBUTION: [SlotWeight; 4] = [
    SlotWeight {
        slots: 1,
        probability: 0.70,
    },
    SlotWeight {
        slots: 2,
        probability: 0.27,
    },
    SlotWeight {
        slots: 3,
        probability: 0.02,
    },
    SlotWeight {
        slots: 4,
        probability: 0.01,
    },
];

/// Share of rare/mythic slots filled by a mythic.
pub const MYTHIC_SLOT_RATE: f64 = 1.0 / 8.0;
/// Share of rare/mythic slots filled by a rare.
pub const RARE_SLOT_RATE: f64 = 7.0 / 8.0;
/// Average uncommon slots per pack (3-5 in practice).
pub const UNCOMMON_SLOTS: f64 = 4.0;
/// Average common slots per pack (6-9 in practice). Used as a fractional exponent.
pub const COMMON_SLOTS: f64 = 7.5;

/// Probability that a single pack contains at least one copy of one specific card
/// of `rarity` from the set described by `set`. Empty populations yield 0.
pub fn probability_per_pack(set: &SetInfo, rarity: Rarity) -> f64 {
    let population = set.population(rarity);
    if population == 0 {
        return 0.0;
    }
    let chance_per_slot = 1.0 / f64::from(population);

    match rarity {
        Rarity::Mythic => rare_slot_probability(MYTHIC_SLOT_RATE * chance_per_slot),
        Rarity::Rare => rare_slot_probability(RARE_SLOT_RATE * chance_per_slot),
        Rarity::Uncommon => at_least_once(chance_per_slot, UNCOMMON_SLOTS),
        Rarity::Common => at_least_once(chance_per_slot, COMMON_SLOTS),
    }
}

fn rare_slot_probability(chance_per_slot: f64) -> f64 {
    RARE_SLOT_DISTRIBUTION
        .iter()
        .map(|weight| {
            let miss_all = (1.0 - chance_per_slot).powi(weight.slots);
            weight.probability * (1.0 - miss_all)
        })
        .sum()
}

fn at_least_once(chance_per_slot: f64, slots: f64) -> f64 {
    1.0 - (1.0 - chance_per_slot).powf(slots)
}
