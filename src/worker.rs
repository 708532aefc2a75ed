//! Bounded worker pool for per-file tasks.

use rayon::prelude::*;

/// Maps every item through `task` on a pool of at most `limit` threads.
///
/// Tasks are independent; results come back in input order once all of
/// them have finished. If the pool cannot be built, items are processed on
/// the calling thread.
pub fn run_bounded<T, R, F>(limit: usize, items: &[T], task: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let threads = limit.max(1).min(items.len());
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("verbump-worker-{}", i))
        .build()
    {
        Ok(pool) => pool.install(|| items.par_iter().map(&task).collect()),
        Err(_) => items.iter().map(task).collect(),
    }
}
