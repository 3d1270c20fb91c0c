//! Damage resolution. Pure functions of a profile, a difficulty and a random source;
//! nothing here touches fighter state.

use serde::{Deserialize, Serialize};

use crate::combat::profile::CombatProfile;
use crate::combat::rng::RandomSource;

pub const TRAINING_MULTIPLIER: f64 = 0.85;
pub const STANDARD_MULTIPLIER: f64 = 1.0;
pub const HIGH_RISK_MULTIPLIER: f64 = 1.15;

pub const SPECIAL_VARIANCE: i32 = 3;

/// Upper bounds (exclusive) of the basic attack tiers and the bonus each grants.
/// `None` is a miss; rolls past the last bound land the top tier.
const BASIC_TIERS: [(f64, Option<u32>); 4] = [
    (0.15, None),
    (0.35, Some(0)),
    (0.55, Some(5)),
    (0.80, Some(10)),
];
const TOP_TIER_BONUS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Training,
    #[default]
    Standard,
    HighRisk,
}

impl Difficulty {
    /// 1 and 3 are special-cased; every other level plays as standard.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Self::Training,
            3 => Self::HighRisk,
            _ => Self::Standard,
        }
    }

    pub const fn level(self) -> u32 {
        match self {
            Self::Training => 1,
            Self::Standard => 2,
            Self::HighRisk => 3,
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Training => TRAINING_MULTIPLIER,
            Self::Standard => STANDARD_MULTIPLIER,
            Self::HighRisk => HIGH_RISK_MULTIPLIER,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Training => "Training",
            Self::Standard => "Standard",
            Self::HighRisk => "High risk",
        }
    }
}

/// Raw (pre-multiplier) basic damage for a tier roll `r` in `[0, 1)`.
pub fn basic_tier_damage(base: u32, r: f64) -> u32 {
    let bonus = BASIC_TIERS
        .iter()
        .find(|(bound, _)| r < *bound)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(Some(TOP_TIER_BONUS));
    match bonus {
        Some(bonus) => base + bonus,
        None => 0,
    }
}

/// Applies the difficulty multiplier, truncating toward zero and flooring at 0.
pub fn scale_damage(raw: i64, difficulty: Difficulty) -> u32 {
    let scaled = (raw as f64 * difficulty.multiplier()) as i64;
    scaled.clamp(0, u32::MAX as i64) as u32
}

pub fn roll_basic_damage<R: RandomSource + ?Sized>(
    attacker: &CombatProfile,
    difficulty: Difficulty,
    rng: &mut R,
) -> u32 {
    let raw = basic_tier_damage(attacker.attack, rng.unit());
    scale_damage(raw as i64, difficulty)
}

pub fn roll_special_damage<R: RandomSource + ?Sized>(
    attacker: &CombatProfile,
    difficulty: Difficulty,
    rng: &mut R,
) -> u32 {
    let variance = rng.int_inclusive(-SPECIAL_VARIANCE, SPECIAL_VARIANCE);
    let raw = (attacker.special_damage as i64 + variance as i64).max(0);
    scale_damage(raw, difficulty)
}
