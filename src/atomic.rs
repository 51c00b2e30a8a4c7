//! Lock-free accumulation.
//!
//! [`AtomicMax`] is only ever updated through a compare-and-swap retry loop.
//! A successful swap can only raise the stored value, so a stale read never
//! lets a smaller candidate overwrite a larger one.

use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;

use tracing::debug;

use crate::error::Result;
use crate::kernel::is_odd;
use crate::worker;

/// Marker for "nothing recorded yet". Values are widened to `i64`, so this
/// can never collide with a real `i32` candidate.
const EMPTY: i64 = i64::MIN;

/// Running maximum shared by any number of threads.
#[derive(Debug)]
pub struct AtomicMax {
    value: AtomicI64,
}

impl AtomicMax {
    pub const fn new() -> Self {
        Self {
            value: AtomicI64::new(EMPTY),
        }
    }

    /// Raises the maximum to `candidate` if it is larger. Returns whether
    /// this call changed the stored value.
    pub fn raise(&self, candidate: i32) -> bool {
        let candidate = i64::from(candidate);
        let mut current = self.value.load(Ordering::Acquire);

        while candidate > current {
            match self.value.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                // Lost the race or failed spuriously: re-read and re-check.
                Err(actual) => current = actual,
            }
        }

        false
    }

    pub fn get(&self) -> Option<i32> {
        match self.value.load(Ordering::Acquire) {
            EMPTY => None,
            v => i32::try_from(v).ok(),
        }
    }
}

impl Default for AtomicMax {
    fn default() -> Self {
        Self::new()
    }
}

/// One worker scans the whole input and raises a shared [`AtomicMax`].
pub fn max_with_atomic(data: &[i32]) -> Result<Option<i32>> {
    max_with_atomic_workers(data, 1)
}

/// Splits the input into `workers` contiguous chunks, one thread each, all
/// raising the same accumulator.
pub fn max_with_atomic_workers(data: &[i32], workers: usize) -> Result<Option<i32>> {
    let max = AtomicMax::new();
    let chunk_len = data.len().div_ceil(workers.max(1)).max(1);

    thread::scope(|s| {
        let mut spawned = Vec::new();
        for (i, chunk) in data.chunks(chunk_len).enumerate() {
            let max = &max;
            spawned.push(worker::spawn(s, format!("atomic-worker-{i}"), move || {
                for &value in chunk.iter().filter(|&&v| is_odd(v)) {
                    max.raise(value);
                }
            })?);
        }
        worker::join_all(spawned).map(drop)
    })?;

    let result = max.get();
    debug!(workers, ?result, "atomic accumulation finished");
    Ok(result)
}
