pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, run_seeded_batches};
pub use pool::WorkerPool;
