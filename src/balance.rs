//! Archetype balance report: every ordered pairing fought CPU-vs-CPU many times.

use serde::Serialize;

use crate::combat::{simulate_cpu_duel, Archetype, Difficulty, DuelOutcome};
use crate::parallel::{run_seeded_batches, WorkerPool};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupResult {
    pub a: Archetype,
    pub b: Archetype,
    pub duels: usize,
    pub a_win_rate: f64,
    pub b_win_rate: f64,
    pub draw_rate: f64,
    pub avg_rounds: f64,
}

#[derive(Debug, Clone, Copy)]
struct DuelTally {
    outcome: DuelOutcome,
    rounds: u32,
}

/// Seeds are derived from the pairing so each matchup draws its own stream.
fn matchup_seed(a: Archetype, b: Archetype, seed: u64) -> u64 {
    let pair = (a as u64) * 4 + b as u64;
    seed ^ pair.wrapping_mul(0x9e3779b97f4a7c15)
}

pub fn run_matchup(
    a: Archetype,
    b: Archetype,
    difficulty: Difficulty,
    iterations: usize,
    seed: u64,
    pool: &WorkerPool,
) -> MatchupResult {
    let tallies = run_seeded_batches(iterations, matchup_seed(a, b, seed), pool, |duel_seed| {
        let report = simulate_cpu_duel(a, b, difficulty, duel_seed);
        DuelTally {
            outcome: report.outcome,
            rounds: report.rounds,
        }
    });

    let rate = |wanted: DuelOutcome| {
        if tallies.is_empty() {
            0.0
        } else {
            tallies.iter().filter(|t| t.outcome == wanted).count() as f64 / tallies.len() as f64
        }
    };
    let avg_rounds = if tallies.is_empty() {
        0.0
    } else {
        tallies.iter().map(|t| f64::from(t.rounds)).sum::<f64>() / tallies.len() as f64
    };

    MatchupResult {
        a,
        b,
        duels: tallies.len(),
        a_win_rate: rate(DuelOutcome::FighterAWins),
        b_win_rate: rate(DuelOutcome::FighterBWins),
        draw_rate: rate(DuelOutcome::Draw),
        avg_rounds,
    }
}

/// All 16 ordered pairings in roster order.
pub fn run_balance_matrix(
    difficulty: Difficulty,
    iterations: usize,
    seed: u64,
    pool: &WorkerPool,
) -> Vec<MatchupResult> {
    tracing::info!(iterations, seed, ?difficulty, "running balance matrix");
    Archetype::ALL
        .into_iter()
        .flat_map(|a| Archetype::ALL.into_iter().map(move |b| (a, b)))
        .map(|(a, b)| run_matchup(a, b, difficulty, iterations, seed, pool))
        .collect()
}
