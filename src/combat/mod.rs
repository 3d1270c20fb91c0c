pub mod damage;
pub mod engine;
pub mod fighter;
pub mod profile;
pub mod rng;

pub use damage::{
    basic_tier_damage, roll_basic_damage, roll_special_damage, scale_damage, Difficulty,
    HIGH_RISK_MULTIPLIER, STANDARD_MULTIPLIER, TRAINING_MULTIPLIER,
};
pub use engine::{
    cpu_fighters, resolve_outcome, simulate_cpu_duel, simulate_cpu_duel_with_sink, Action,
    ActionSource, Controller, DuelConfig, DuelEngine, DuelEvent, DuelOutcome, DuelReport,
    DuelSink, DuelState, HitLog, HitSummary, NullSink, ScriptedActions, Side, SideReport,
    CPU_SPECIAL_PERCENT, MAX_RECORDED_HITS,
};
pub use fighter::{
    ensure_distinct_names, normalize_name, Fighter, FighterSnapshot, MANA_REGEN_PER_TICK,
    MAX_MANA,
};
pub use profile::{roster, Archetype, CombatProfile};
pub use rng::{RandomSource, Rng};
