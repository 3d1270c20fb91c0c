//! Turn state machine for a two-fighter duel.
//!
//! Sides alternate strictly (A, B, A, B, ...). After every A-then-B pair both
//! fighters tick cooldown and mana regeneration once. A half-turn that drops the
//! opponent to zero health ends the duel on the spot.

use std::collections::VecDeque;

use serde::Serialize;

use crate::combat::damage::{roll_basic_damage, roll_special_damage, Difficulty};
use crate::combat::fighter::{ensure_distinct_names, Fighter, FighterSnapshot};
use crate::combat::profile::Archetype;
use crate::combat::rng::{RandomSource, Rng};

/// Hits logged per fighter; later hits still land but are not recorded.
pub const MAX_RECORDED_HITS: usize = 120;
pub const CPU_SPECIAL_PERCENT: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Cpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Basic,
    Special,
}

impl Action {
    /// `1` is basic, `2` is special.
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Basic),
            2 => Some(Self::Special),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelOutcome {
    FighterAWins,
    FighterBWins,
    Draw,
}

impl DuelOutcome {
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::FighterAWins => Some(Side::A),
            Self::FighterBWins => Some(Side::B),
            Self::Draw => None,
        }
    }

    pub const fn loser(self) -> Option<Side> {
        match self.winner() {
            Some(side) => Some(side.other()),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelState {
    Setup,
    Turn(Side),
    Resolved(DuelOutcome),
}

/// Chooses actions for human-controlled sides. Implementations must only ever
/// return a valid [Action]; re-prompting on bad input is their job.
pub trait ActionSource {
    fn choose_action(&mut self, actor: &Fighter, opponent: &Fighter) -> Action;
}

/// Replays a fixed list of actions, then repeats `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedActions {
    queue: VecDeque<Action>,
    fallback: Action,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = Action>, fallback: Action) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            fallback,
        }
    }

    pub fn repeat(action: Action) -> Self {
        Self::new([], action)
    }
}

impl ActionSource for ScriptedActions {
    fn choose_action(&mut self, _actor: &Fighter, _opponent: &Fighter) -> Action {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuelEvent {
    Intro {
        side: Side,
        name: String,
        archetype: Archetype,
        line: &'static str,
    },
    Status {
        a: FighterSnapshot,
        b: FighterSnapshot,
    },
    TurnStart {
        side: Side,
        name: String,
        round: u32,
    },
    SpecialUnavailable {
        side: Side,
        name: String,
    },
    Special {
        side: Side,
        name: String,
        ability: &'static str,
        damage: u32,
    },
    /// `damage == 0` is a miss.
    Basic {
        side: Side,
        name: String,
        flourish: &'static str,
        damage: u32,
    },
    Outcome {
        outcome: DuelOutcome,
        winner: Option<String>,
    },
    Summary {
        side: Side,
        name: String,
        summary: Option<HitSummary>,
    },
}

pub trait DuelSink {
    fn emit(&mut self, event: DuelEvent);
}

impl DuelSink for Vec<DuelEvent> {
    fn emit(&mut self, event: DuelEvent) {
        self.push(event);
    }
}

/// Discards every event (batch simulation).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DuelSink for NullSink {
    fn emit(&mut self, _event: DuelEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitSummary {
    pub hits: usize,
    pub total: u64,
    pub max: u32,
    pub average: f64,
}

/// Positive damage values dealt by one fighter, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitLog {
    hits: Vec<u32>,
}

impl HitLog {
    pub fn record(&mut self, damage: u32) {
        if damage > 0 && self.hits.len() < MAX_RECORDED_HITS {
            self.hits.push(damage);
        }
    }

    pub fn hits(&self) -> &[u32] {
        &self.hits
    }

    /// `None` when nothing landed, so no average is ever divided by zero.
    pub fn summary(&self) -> Option<HitSummary> {
        if self.hits.is_empty() {
            return None;
        }
        let total: u64 = self.hits.iter().map(|&hit| u64::from(hit)).sum();
        let max = self.hits.iter().copied().max().unwrap_or(0);
        Some(HitSummary {
            hits: self.hits.len(),
            total,
            max,
            average: total as f64 / self.hits.len() as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuelConfig {
    pub difficulty: Difficulty,
    /// Indexed by [Side::index].
    pub controllers: [Controller; 2],
    /// Chance (0..=100) that a CPU fighter uses a ready special.
    pub cpu_special_percent: u32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self::human_vs_cpu(Difficulty::Standard)
    }
}

impl DuelConfig {
    pub fn human_vs_cpu(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            controllers: [Controller::Human, Controller::Cpu],
            cpu_special_percent: CPU_SPECIAL_PERCENT,
        }
    }

    pub fn cpu_vs_cpu(difficulty: Difficulty) -> Self {
        Self {
            controllers: [Controller::Cpu, Controller::Cpu],
            ..Self::human_vs_cpu(difficulty)
        }
    }

    pub fn human_vs_human(difficulty: Difficulty) -> Self {
        Self {
            controllers: [Controller::Human, Controller::Human],
            ..Self::human_vs_cpu(difficulty)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideReport {
    pub name: String,
    pub archetype: Archetype,
    pub health_remaining: u32,
    pub hits: Vec<u32>,
    pub summary: Option<HitSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelReport {
    pub outcome: DuelOutcome,
    pub winner: Option<String>,
    pub difficulty: Difficulty,
    pub rounds: u32,
    pub half_turns: u32,
    pub a: SideReport,
    pub b: SideReport,
}

impl DuelReport {
    pub fn side(&self, side: Side) -> &SideReport {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// Termination check: `None` while both stand, `Draw` when both are down.
pub fn resolve_outcome(a: &Fighter, b: &Fighter) -> Option<DuelOutcome> {
    match (a.is_down(), b.is_down()) {
        (true, true) => Some(DuelOutcome::Draw),
        (true, false) => Some(DuelOutcome::FighterBWins),
        (false, true) => Some(DuelOutcome::FighterAWins),
        (false, false) => None,
    }
}

pub struct DuelEngine<R: RandomSource> {
    fighters: [Fighter; 2],
    logs: [HitLog; 2],
    config: DuelConfig,
    rng: R,
    state: DuelState,
    a_turn: bool,
    round: u32,
    half_turns: u32,
}

impl<R: RandomSource> DuelEngine<R> {
    /// Takes ownership of both fighters so the two sides can never alias.
    pub fn new(a: Fighter, b: Fighter, config: DuelConfig, rng: R) -> Self {
        Self {
            fighters: [a, b],
            logs: [HitLog::default(), HitLog::default()],
            config,
            rng,
            state: DuelState::Setup,
            a_turn: true,
            round: 1,
            half_turns: 0,
        }
    }

    pub fn state(&self) -> DuelState {
        self.state
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    pub fn hit_log(&self, side: Side) -> &HitLog {
        &self.logs[side.index()]
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn half_turns(&self) -> u32 {
        self.half_turns
    }

    /// Runs to resolution and returns the report. A human side blocks on `actions`.
    pub fn run(&mut self, actions: &mut dyn ActionSource, sink: &mut dyn DuelSink) -> DuelReport {
        loop {
            if let DuelState::Resolved(outcome) = self.step(actions, sink) {
                return self.build_report(outcome);
            }
        }
    }

    /// Advances one transition: setup, one half-turn, or resolution.
    pub fn step(&mut self, actions: &mut dyn ActionSource, sink: &mut dyn DuelSink) -> DuelState {
        match self.state {
            DuelState::Setup => self.setup(sink),
            DuelState::Turn(side) => {
                if let Some(outcome) = resolve_outcome(&self.fighters[0], &self.fighters[1]) {
                    self.finish(outcome, sink);
                } else {
                    self.play_turn(side, actions, sink);
                }
            }
            DuelState::Resolved(_) => {}
        }
        self.state
    }

    fn setup(&mut self, sink: &mut dyn DuelSink) {
        for fighter in &mut self.fighters {
            fighter.reset_health();
        }
        self.logs = [HitLog::default(), HitLog::default()];
        self.a_turn = true;
        self.round = 1;
        self.half_turns = 0;

        for side in [Side::A, Side::B] {
            let fighter = &self.fighters[side.index()];
            sink.emit(DuelEvent::Intro {
                side,
                name: fighter.name().to_string(),
                archetype: fighter.archetype(),
                line: fighter.profile().intro_line,
            });
        }
        self.emit_status(sink);
        self.state = DuelState::Turn(Side::A);
    }

    fn play_turn(&mut self, side: Side, actions: &mut dyn ActionSource, sink: &mut dyn DuelSink) {
        let knocked_out = self.half_turn(side, actions, sink);
        self.half_turns += 1;

        if knocked_out {
            if let Some(outcome) = resolve_outcome(&self.fighters[0], &self.fighters[1]) {
                self.finish(outcome, sink);
                return;
            }
        }

        self.a_turn = !self.a_turn;
        if self.half_turns % 2 == 0 {
            for fighter in &mut self.fighters {
                fighter.tick_cooldown();
            }
            self.round += 1;
        }
        let next = if self.a_turn { Side::A } else { Side::B };
        self.state = DuelState::Turn(next);
    }

    /// Returns true when the opponent ends the half-turn at zero health.
    fn half_turn(&mut self, side: Side, actions: &mut dyn ActionSource, sink: &mut dyn DuelSink) -> bool {
        let actor_idx = side.index();
        let target_idx = side.other().index();
        let difficulty = self.config.difficulty;
        let profile = self.fighters[actor_idx].profile();
        let eligible = self.fighters[actor_idx].special_ready();
        let actor_name = self.fighters[actor_idx].name().to_string();

        sink.emit(DuelEvent::TurnStart {
            side,
            name: actor_name.clone(),
            round: self.round,
        });

        let chosen = match self.config.controllers[actor_idx] {
            Controller::Human => {
                actions.choose_action(&self.fighters[actor_idx], &self.fighters[target_idx])
            }
            Controller::Cpu => self.cpu_action(eligible),
        };

        let damage = if chosen == Action::Special && eligible {
            let actor = &mut self.fighters[actor_idx];
            actor.spend_mana(profile.special_mana_cost);
            actor.trigger_cooldown();
            let damage = roll_special_damage(profile, difficulty, &mut self.rng);
            sink.emit(DuelEvent::Special {
                side,
                name: actor_name,
                ability: profile.special_name,
                damage,
            });
            damage
        } else {
            if chosen == Action::Special {
                sink.emit(DuelEvent::SpecialUnavailable {
                    side,
                    name: actor_name.clone(),
                });
            }
            let damage = roll_basic_damage(profile, difficulty, &mut self.rng);
            sink.emit(DuelEvent::Basic {
                side,
                name: actor_name,
                flourish: profile.basic_flourish,
                damage,
            });
            damage
        };

        self.logs[actor_idx].record(damage);
        self.fighters[target_idx].apply_damage(damage);
        tracing::debug!(
            ?side,
            ?chosen,
            damage,
            target_health = self.fighters[target_idx].health(),
            round = self.round,
            "half-turn resolved"
        );
        self.emit_status(sink);

        self.fighters[target_idx].is_down()
    }

    fn cpu_action(&mut self, eligible: bool) -> Action {
        if eligible && self.rng.int_inclusive(1, 100) <= self.config.cpu_special_percent as i32 {
            Action::Special
        } else {
            Action::Basic
        }
    }

    fn finish(&mut self, outcome: DuelOutcome, sink: &mut dyn DuelSink) {
        self.state = DuelState::Resolved(outcome);
        let winner = outcome
            .winner()
            .map(|side| self.fighters[side.index()].name().to_string());
        tracing::info!(?outcome, winner = winner.as_deref(), rounds = self.round, "duel resolved");

        sink.emit(DuelEvent::Outcome { outcome, winner });
        for side in [Side::A, Side::B] {
            sink.emit(DuelEvent::Summary {
                side,
                name: self.fighters[side.index()].name().to_string(),
                summary: self.logs[side.index()].summary(),
            });
        }
    }

    fn emit_status(&self, sink: &mut dyn DuelSink) {
        sink.emit(DuelEvent::Status {
            a: self.fighters[0].snapshot(),
            b: self.fighters[1].snapshot(),
        });
    }

    fn side_report(&self, side: Side) -> SideReport {
        let fighter = &self.fighters[side.index()];
        let log = &self.logs[side.index()];
        SideReport {
            name: fighter.name().to_string(),
            archetype: fighter.archetype(),
            health_remaining: fighter.health(),
            hits: log.hits().to_vec(),
            summary: log.summary(),
        }
    }

    fn build_report(&self, outcome: DuelOutcome) -> DuelReport {
        DuelReport {
            outcome,
            winner: outcome
                .winner()
                .map(|side| self.fighters[side.index()].name().to_string()),
            difficulty: self.config.difficulty,
            rounds: self.round,
            half_turns: self.half_turns,
            a: self.side_report(Side::A),
            b: self.side_report(Side::B),
        }
    }
}

/// Builds both fighters for a CPU-only duel. Mirror matches get distinct names.
pub fn cpu_fighters(a: Archetype, b: Archetype) -> (Fighter, Fighter) {
    let a_name = a.name().to_string();
    let mut b_name = b.name().to_string();
    ensure_distinct_names(&a_name, &mut b_name);
    (Fighter::new(a_name, a), Fighter::new(b_name, b))
}

/// Seeded CPU-vs-CPU duel with no narration.
pub fn simulate_cpu_duel(a: Archetype, b: Archetype, difficulty: Difficulty, seed: u64) -> DuelReport {
    simulate_cpu_duel_with_sink(a, b, difficulty, seed, &mut NullSink)
}

pub fn simulate_cpu_duel_with_sink(
    a: Archetype,
    b: Archetype,
    difficulty: Difficulty,
    seed: u64,
    sink: &mut dyn DuelSink,
) -> DuelReport {
    let (fighter_a, fighter_b) = cpu_fighters(a, b);
    let mut engine = DuelEngine::new(
        fighter_a,
        fighter_b,
        DuelConfig::cpu_vs_cpu(difficulty),
        Rng::new(seed),
    );
    // CPU sides never consult the action source.
    let mut unused = ScriptedActions::repeat(Action::Basic);
    engine.run(&mut unused, sink)
}
