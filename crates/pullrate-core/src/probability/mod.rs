//! Pull-rate model for play boosters.
//!
//! - `pack`: chance that one pack contains a specific card of a given rarity.
//! - `odds`: multi-pack figures derived from the per-pack chance, treating packs
//!   as independent draws (with replacement).

mod odds;
mod pack;

use thiserror::Error;

pub use odds::{PullOdds, boxes_needed, expected_copies, packs_needed, pull_probability};
pub use pack::{
    COMMON_SLOTS, MYTHIC_SLOT_RATE, RARE_SLOT_DISTRIBUTION, RARE_SLOT_RATE, SlotWeight,
    UNCOMMON_SLOTS, probability_per_pack,
};

/// Packs in one booster box.
pub const PACKS_PER_BOX: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProbabilityError {
    #[error("target probability {target} must be in [0, 1)")]
    TargetOutOfRange { target: f64 },
}
