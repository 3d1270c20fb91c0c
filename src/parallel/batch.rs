//! Splits seeded duel iterations into contiguous chunks for parallel execution.

use rayon::prelude::*;

use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Earlier batches absorb the remainder, one extra item each.
///
/// # Example
/// ```
/// # use duel_arena::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![(0, 4), (4, 7), (7, 10)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut start = 0;
    (0..num_batches)
        .map(|i| {
            let end = start + base + usize::from(i < remainder);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

/// Four batches per thread of the pool this is called from. Must run inside
/// [WorkerPool::install] to see a dedicated pool's thread count.
fn current_pool_batches(iterations: usize) -> Vec<(usize, usize)> {
    batch_ranges(iterations, rayon::current_num_threads().max(1) * 4)
}

/// Runs `run_one(seed)` for seeds `base_seed + i`, `i in 0..iterations`, across
/// the pool and returns results in seed order. Seed-per-iteration keeps the
/// output identical regardless of thread count.
pub fn run_seeded_batches<T, F>(iterations: usize, base_seed: u64, pool: &WorkerPool, run_one: F) -> Vec<T>
where
    T: Send,
    F: Fn(u64) -> T + Sync + Send,
{
    pool.install(|| {
        current_pool_batches(iterations)
            .into_par_iter()
            .flat_map_iter(|(start, end)| {
                (start..end).map(|i| run_one(base_seed.wrapping_add(i as u64))).collect::<Vec<_>>()
            })
            .collect()
    })
}
