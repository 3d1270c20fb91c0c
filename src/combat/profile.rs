use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Ninja,
    Pirate,
    Samurai,
    Viking,
}

/// Fixed stat template shared by every fighter of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatProfile {
    pub archetype: Archetype,
    pub display_name: &'static str,
    pub max_health: u32,
    pub attack: u32,
    pub special_name: &'static str,
    pub special_damage: u32,
    pub special_cooldown: u32,
    pub special_mana_cost: u32,
    /// Line spoken when the fighter enters the arena.
    pub intro_line: &'static str,
    /// Narration for a basic attack.
    pub basic_flourish: &'static str,
}

pub const NINJA_PROFILE: CombatProfile = CombatProfile {
    archetype: Archetype::Ninja,
    display_name: "Ninja",
    max_health: 95,
    attack: 24,
    special_name: "Shadow Strike",
    special_damage: 34,
    special_cooldown: 3,
    special_mana_cost: 45,
    intro_line: "The shadows follow me.",
    basic_flourish: "Throwing stars.",
};

pub const PIRATE_PROFILE: CombatProfile = CombatProfile {
    archetype: Archetype::Pirate,
    display_name: "Pirate",
    max_health: 105,
    attack: 24,
    special_name: "Cannon Shot",
    special_damage: 36,
    special_cooldown: 4,
    special_mana_cost: 55,
    intro_line: "The sea calls my name.",
    basic_flourish: "Sword swing.",
};

pub const SAMURAI_PROFILE: CombatProfile = CombatProfile {
    archetype: Archetype::Samurai,
    display_name: "Samurai",
    max_health: 100,
    attack: 22,
    special_name: "Iaido Cut",
    special_damage: 30,
    special_cooldown: 2,
    special_mana_cost: 35,
    intro_line: "Honor decides this duel.",
    basic_flourish: "Iaido Cut.",
};

pub const VIKING_PROFILE: CombatProfile = CombatProfile {
    archetype: Archetype::Viking,
    display_name: "Viking",
    max_health: 120,
    attack: 26,
    special_name: "Rage Smash",
    special_damage: 40,
    special_cooldown: 4,
    special_mana_cost: 60,
    intro_line: "The storm is here.",
    basic_flourish: "Rage Smash.",
};

impl Archetype {
    /// Menu order.
    pub const ALL: [Archetype; 4] = [Self::Ninja, Self::Pirate, Self::Samurai, Self::Viking];

    pub const fn profile(self) -> &'static CombatProfile {
        match self {
            Self::Ninja => &NINJA_PROFILE,
            Self::Pirate => &PIRATE_PROFILE,
            Self::Samurai => &SAMURAI_PROFILE,
            Self::Viking => &VIKING_PROFILE,
        }
    }

    /// Maps a 1-based menu choice to an archetype.
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Ninja),
            2 => Some(Self::Pirate),
            3 => Some(Self::Samurai),
            4 => Some(Self::Viking),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        self.profile().display_name
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(choice) = wanted.parse::<u32>() {
            return Self::from_choice(choice).ok_or_else(|| format!("unknown class choice {choice}"));
        }
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown class '{wanted}'"))
    }
}

pub fn roster() -> Vec<&'static CombatProfile> {
    Archetype::ALL.into_iter().map(Archetype::profile).collect()
}
