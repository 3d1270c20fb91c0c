//! Duel throughput: seeded CPU-vs-CPU duels per second, with and without narration.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use duel_arena::balance::run_matchup;
use duel_arena::combat::{simulate_cpu_duel, simulate_cpu_duel_with_sink, Archetype, Difficulty};
use duel_arena::parallel::WorkerPool;

fn bench_single_duel(c: &mut Criterion) {
    let mut group = c.benchmark_group("duel");
    group.throughput(Throughput::Elements(1));

    group.bench_function("cpu_duel_silent", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(simulate_cpu_duel(
                Archetype::Ninja,
                Archetype::Viking,
                Difficulty::Standard,
                black_box(seed),
            ))
        })
    });

    group.bench_function("cpu_duel_with_events", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut events = Vec::with_capacity(64);
            black_box(simulate_cpu_duel_with_sink(
                Archetype::Samurai,
                Archetype::Pirate,
                Difficulty::HighRisk,
                black_box(seed),
                &mut events,
            ));
            events
        })
    });

    group.finish();
}

fn bench_matchup(c: &mut Criterion) {
    let iterations = 1_000usize;
    let mut group = c.benchmark_group("matchup");
    group.sample_size(20);
    group.throughput(Throughput::Elements(iterations as u64));

    for (label, pool) in [
        ("single_thread", WorkerPool::with_workers(1)),
        ("all_cores", WorkerPool::default()),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| {
                black_box(run_matchup(
                    Archetype::Viking,
                    Archetype::Pirate,
                    Difficulty::Standard,
                    iterations,
                    42,
                    &pool,
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_duel, bench_matchup);
criterion_main!(benches);
