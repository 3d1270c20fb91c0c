//! Rayon thread pool configuration for batch duel simulation.

use rayon::ThreadPoolBuilder;

/// How many worker threads batch simulation uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// 0 means the global Rayon pool (all cores).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Runs `f` on a pool of [workers](WorkerPool::workers) threads. If a
    /// dedicated pool cannot be built the global pool is used instead.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(%err, workers = self.workers, "falling back to global rayon pool");
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_pool_uses_requested_thread_count() {
        let threads = WorkerPool::with_workers(2).install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }

    #[test]
    fn zero_workers_runs_inline_on_global_pool() {
        assert_eq!(WorkerPool::default().install(|| 7), 7);
    }
}
