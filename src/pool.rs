//! Work queue drained by a fixed pool of threads.
//!
//! The queue is filled before any worker starts. Workers pop without
//! waiting and leave the first time the queue reports empty; since every pop
//! happens under the queue's lock, no element is skipped or taken twice.

use std::thread;

use tracing::{debug, trace};

use crate::atomic::AtomicMax;
use crate::error::{HarnessError, Result};
use crate::kernel::is_odd;
use crate::queue::SyncQueue;
use crate::worker;

pub const DEFAULT_POOL_WORKERS: usize = 4;
/// Upper bound for any worker count taken from configuration.
pub const MAX_WORKERS: usize = 1024;

pub fn max_with_thread_pool(data: &[i32], workers: usize) -> Result<Option<i32>> {
    if workers == 0 {
        return Err(HarnessError::invalid_config(
            "pool_workers",
            "the pool needs at least one worker",
        ));
    }
    if workers > MAX_WORKERS {
        return Err(HarnessError::invalid_config(
            "pool_workers",
            format!("{workers} workers exceeds the limit of {MAX_WORKERS}"),
        ));
    }

    let queue: SyncQueue<i32> = data.iter().copied().collect();
    let max = AtomicMax::new();

    let popped = thread::scope(|s| {
        let mut pool = Vec::with_capacity(workers);
        for i in 0..workers {
            let (queue, max) = (&queue, &max);
            pool.push(worker::spawn(s, format!("pool-worker-{i}"), move || {
                let mut popped = 0usize;
                while let Some(value) = queue.try_pop() {
                    popped += 1;
                    if is_odd(value) && max.raise(value) {
                        trace!(value, "raised maximum");
                    }
                }
                popped
            })?);
        }
        worker::join_all(pool)
    })?;

    debug!(workers, ?popped, "pool drained queue");
    Ok(max.get())
}
