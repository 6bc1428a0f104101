use serde::Serialize;

use super::pack::probability_per_pack;
use super::{PACKS_PER_BOX, ProbabilityError};
use crate::model::{Rarity, SetInfo};

/// Chance of pulling at least one copy of a specific card after `packs` packs.
///
/// Packs are treated as independent identical trials, `1 - (1 - p)^packs`.
pub fn pull_probability(set: &SetInfo, rarity: Rarity, packs: u32) -> f64 {
    let per_pack = probability_per_pack(set, rarity);
    if per_pack == 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - per_pack).powf(f64::from(packs))
}

/// Expected number of copies after `packs` packs (`packs * p`).
pub fn expected_copies(set: &SetInfo, rarity: Rarity, packs: u32) -> f64 {
    f64::from(packs) * probability_per_pack(set, rarity)
}

/// Smallest pack count whose pull probability reaches `target`.
///
/// Returns `f64::INFINITY` when the card cannot be pulled at all. `target` must lie in `[0, 1)`.
pub fn packs_needed(set: &SetInfo, rarity: Rarity, target: f64) -> Result<f64, ProbabilityError> {
    if !(0.0..1.0).contains(&target) {
        return Err(ProbabilityError::TargetOutOfRange { target });
    }

    let per_pack = probability_per_pack(set, rarity);
    if per_pack == 0.0 {
        return Ok(f64::INFINITY);
    }
    if target == 0.0 {
        return Ok(0.0);
    }
    if per_pack >= 1.0 {
        return Ok(1.0);
    }

    let packs = ((1.0 - target).ln() / (1.0 - per_pack).ln()).ceil();
    Ok(packs)
}

/// Booster boxes needed to reach `target`, rounding the pack count up to whole boxes.
pub fn boxes_needed(set: &SetInfo, rarity: Rarity, target: f64) -> Result<f64, ProbabilityError> {
    let packs = packs_needed(set, rarity, target)?;
    Ok((packs / f64::from(PACKS_PER_BOX)).ceil())
}

/// All forward figures for one query, in the shape the presentation layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PullOdds {
    pub rarity: Rarity,
    pub packs: u32,
    pub per_pack: f64,
    pub at_least_one: f64,
    pub expected_copies: f64,
}

impl PullOdds {
    pub fn compute(set: &SetInfo, rarity: Rarity, packs: u32) -> Self {
        Self {
            rarity,
            packs,
            per_pack: probability_per_pack(set, rarity),
            at_least_one: pull_probability(set, rarity, packs),
            expected_copies: expected_copies(set, rarity, packs),
        }
    }
}
