//! Per-duel fighter state. Each side owns its own `Fighter`; two fighters of the
//! same archetype share only the `'static` profile table, never mutable state.

use serde::Serialize;

use crate::combat::profile::{Archetype, CombatProfile};
use crate::data::sanitize_name;

pub const MAX_MANA: u32 = 100;
pub const MANA_REGEN_PER_TICK: u32 = 10;
pub const DEFAULT_FIGHTER_NAME: &str = "Player";
pub const DUPLICATE_NAME_SUFFIX: &str = " Two";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    name: String,
    archetype: Archetype,
    health: u32,
    max_health: u32,
    mana: u32,
    max_mana: u32,
    cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub archetype: Archetype,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub cooldown: u32,
}

impl Fighter {
    pub fn new(name: impl Into<String>, archetype: Archetype) -> Self {
        let max_health = archetype.profile().max_health.max(1);
        Self {
            name: name.into(),
            archetype,
            health: max_health,
            max_health,
            mana: MAX_MANA,
            max_mana: MAX_MANA,
            cooldown: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn profile(&self) -> &'static CombatProfile {
        self.archetype.profile()
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn is_down(&self) -> bool {
        self.health == 0
    }

    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Overspending drains mana to zero rather than failing.
    pub fn spend_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_sub(amount);
    }

    /// One tick per fighter per full round: cooldown steps down and mana regenerates.
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.mana < self.max_mana {
            self.mana = (self.mana + MANA_REGEN_PER_TICK).min(self.max_mana);
        }
    }

    /// Cooldown only; mana sufficiency is the caller's check.
    pub fn can_use_special(&self) -> bool {
        self.cooldown == 0
    }

    pub fn has_mana_for_special(&self) -> bool {
        self.mana >= self.profile().special_mana_cost
    }

    pub fn special_ready(&self) -> bool {
        self.can_use_special() && self.has_mana_for_special()
    }

    pub fn trigger_cooldown(&mut self) {
        self.cooldown = self.profile().special_cooldown;
    }

    pub fn reset_health(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
        self.cooldown = 0;
    }

    pub fn snapshot(&self) -> FighterSnapshot {
        FighterSnapshot {
            name: self.name.clone(),
            archetype: self.archetype,
            health: self.health,
            max_health: self.max_health,
            mana: self.mana,
            max_mana: self.max_mana,
            cooldown: self.cooldown,
        }
    }
}

/// Trims a user-supplied name and makes it ledger-safe (see [sanitize_name]);
/// blank input becomes [DEFAULT_FIGHTER_NAME].
pub fn normalize_name(raw: &str) -> String {
    let cleaned = sanitize_name(raw);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        DEFAULT_FIGHTER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Renames `b` when it collides with `a`. Returns true if a rename happened.
pub fn ensure_distinct_names(a: &str, b: &mut String) -> bool {
    if a == b.as_str() {
        b.push_str(DUPLICATE_NAME_SUFFIX);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fighter_starts_full() {
        let viking = Fighter::new("Bjorn", Archetype::Viking);
        assert_eq!(viking.health(), 120);
        assert_eq!(viking.max_health(), 120);
        assert_eq!(viking.mana(), MAX_MANA);
        assert_eq!(viking.cooldown(), 0);
        assert!(viking.special_ready());
    }

    #[test]
    fn damage_floors_at_zero_and_stays_there() {
        let mut ninja = Fighter::new("Rin", Archetype::Ninja);
        ninja.apply_damage(40);
        assert_eq!(ninja.health(), 55);
        ninja.apply_damage(500);
        assert_eq!(ninja.health(), 0);
        assert!(ninja.is_down());
        ninja.apply_damage(1);
        assert_eq!(ninja.health(), 0);
    }

    #[test]
    fn overspending_mana_clamps_silently() {
        let mut pirate = Fighter::new("Anne", Archetype::Pirate);
        pirate.spend_mana(55);
        pirate.spend_mana(55);
        assert_eq!(pirate.mana(), 0);
    }

    #[test]
    fn tick_regenerates_mana_up_to_cap_and_drains_cooldown() {
        let mut samurai = Fighter::new("Ken", Archetype::Samurai);
        samurai.spend_mana(35);
        samurai.trigger_cooldown();
        assert_eq!(samurai.cooldown(), 2);
        assert!(!samurai.can_use_special());

        samurai.tick_cooldown();
        assert_eq!(samurai.cooldown(), 1);
        assert_eq!(samurai.mana(), 75);

        for _ in 0..10 {
            samurai.tick_cooldown();
        }
        assert_eq!(samurai.cooldown(), 0);
        assert_eq!(samurai.mana(), MAX_MANA);
    }

    #[test]
    fn mana_regen_does_not_overshoot() {
        let mut viking = Fighter::new("Ulf", Archetype::Viking);
        viking.spend_mana(5);
        viking.tick_cooldown();
        assert_eq!(viking.mana(), MAX_MANA);
    }

    #[test]
    fn cooldown_alone_gates_can_use_special() {
        let mut ninja = Fighter::new("Rin", Archetype::Ninja);
        ninja.spend_mana(90);
        assert!(ninja.can_use_special());
        assert!(!ninja.special_ready());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut pirate = Fighter::new("Anne", Archetype::Pirate);
        pirate.apply_damage(30);
        pirate.spend_mana(55);
        pirate.trigger_cooldown();

        pirate.reset_health();
        let once = pirate.clone();
        pirate.reset_health();
        assert_eq!(pirate, once);
        assert_eq!(pirate.health(), 105);
        assert_eq!(pirate.mana(), MAX_MANA);
        assert_eq!(pirate.cooldown(), 0);
    }

    #[test]
    fn same_archetype_fighters_do_not_share_state() {
        let mut a = Fighter::new("One", Archetype::Ninja);
        let b = Fighter::new("Two", Archetype::Ninja);
        a.apply_damage(50);
        a.trigger_cooldown();
        assert_eq!(b.health(), 95);
        assert_eq!(b.cooldown(), 0);
    }

    #[test]
    fn duplicate_names_get_suffix() {
        let mut b = "Rin".to_string();
        assert!(ensure_distinct_names("Rin", &mut b));
        assert_eq!(b, "Rin Two");

        let mut c = "Ken".to_string();
        assert!(!ensure_distinct_names("Rin", &mut c));
        assert_eq!(c, "Ken");
    }

    #[test]
    fn blank_names_default_to_player() {
        assert_eq!(normalize_name("   "), DEFAULT_FIGHTER_NAME);
        assert_eq!(normalize_name(" Rin \n"), "Rin");
        assert_eq!(normalize_name(" Jack|Sparrow "), "Jack/Sparrow");
        assert_eq!(normalize_name("|\t"), "/");
    }
}
