//! Single-worker strategies.
//!
//! Each variant hands the whole input to exactly one worker and blocks until
//! it is done. They differ only in how the result travels back:
//!
//! - [`max_with_os_thread`]: a shared slot written once, read after the join.
//! - [`max_with_native_thread`]: the worker writes through a captured `&mut`.
//! - [`max_with_promise`]: a single-use [`Promise`] handle.
//!
//! All workers are spawned inside [`std::thread::scope`], so a handle that is
//! dropped without being joined is still joined when the scope ends.

use std::sync::OnceLock;
use std::thread::{self, Scope};

use crossbeam::channel::{self, Receiver};

use crate::error::{HarnessError, Result};
use crate::kernel::find_max_odd;
use crate::worker::{self, Worker};

const OS_WORKER: &str = "os-thread-worker";
const NATIVE_WORKER: &str = "native-thread-worker";
const PROMISE_WORKER: &str = "promise-worker";

pub fn max_with_os_thread(data: &[i32]) -> Result<Option<i32>> {
    let slot = OnceLock::new();

    thread::scope(|s| {
        // Only this worker ever writes the slot.
        worker::spawn(s, OS_WORKER, || {
            let _ = slot.set(find_max_odd(data));
        })?
        .join()
    })?;

    slot.into_inner().ok_or_else(|| HarnessError::panicked(OS_WORKER))
}

pub fn max_with_native_thread(data: &[i32]) -> Result<Option<i32>> {
    let mut result = None;
    let out = &mut result;

    thread::scope(|s| {
        worker::spawn(s, NATIVE_WORKER, move || {
            *out = find_max_odd(data);
        })?
        .join()
    })?;

    Ok(result)
}

pub fn max_with_promise(data: &[i32]) -> Result<Option<i32>> {
    thread::scope(|s| Promise::launch(s, PROMISE_WORKER, || find_max_odd(data))?.get())
}

// =============================================================================
// Promise
// =============================================================================

/// A value being computed by a scoped worker thread.
///
/// [`Promise::get`] consumes the handle, so a value can be fetched only once.
pub struct Promise<'scope, T> {
    value: Receiver<T>,
    worker: Worker<'scope, ()>,
}

impl<'scope, T: Send + 'scope> Promise<'scope, T> {
    /// Starts `f` on a new thread inside `scope` and returns immediately.
    pub fn launch<'env, F>(
        scope: &'scope Scope<'scope, 'env>,
        name: impl Into<String>,
        f: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'scope,
    {
        let (tx, rx) = channel::bounded(1);
        let worker = worker::spawn(scope, name, move || {
            // The receiver is gone if the promise was dropped unread.
            let _ = tx.send(f());
        })?;

        Ok(Self { value: rx, worker })
    }

    /// Blocks until the worker has produced its value and exited.
    pub fn get(self) -> Result<T> {
        let received = self.value.recv();
        self.worker.join()?;
        received.map_err(|_| HarnessError::PromiseBroken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type SingleWorker = fn(&[i32]) -> Result<Option<i32>>;

    const VARIANTS: [(&str, SingleWorker); 3] = [
        ("os thread", max_with_os_thread),
        ("native thread", max_with_native_thread),
        ("promise", max_with_promise),
    ];

    #[test]
    fn test_examples_for_every_variant() {
        for (name, run) in VARIANTS {
            assert_eq!(run(&[4, 7, 2, 9, 9, 6]).unwrap(), Some(9), "{name}");
            assert_eq!(run(&[2, 4, 6, 8]).unwrap(), None, "{name}");
            assert_eq!(run(&[]).unwrap(), None, "{name}");
            assert_eq!(run(&[-3, -5, -1]).unwrap(), Some(-1), "{name}");
        }
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let data: Vec<i32> = (0..500).map(|i| (i * 37) % 101 - 50).collect();
        let expected = find_max_odd(&data);
        for (name, run) in VARIANTS {
            for _ in 0..50 {
                assert_eq!(run(&data).unwrap(), expected, "{name}");
            }
        }
    }

    #[test]
    fn test_promise_delivers_value() {
        let value = thread::scope(|s| Promise::launch(s, "answer", || 6 * 7)?.get()).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_promise_surfaces_worker_panic() {
        let result: Result<i32> =
            thread::scope(|s| Promise::launch(s, "doomed", || -> i32 { panic!("boom") })?.get());
        match result {
            Err(HarnessError::WorkerPanicked { worker }) => assert_eq!(worker, "doomed"),
            other => panic!("expected WorkerPanicked, got {other:?}"),
        }
    }

    #[test]
    fn test_dropped_promise_is_still_joined() {
        let mut ran = false;
        let flag = &mut ran;
        thread::scope(|s| {
            let promise = Promise::launch(s, "unread", move || *flag = true).unwrap();
            drop(promise);
        });
        assert!(ran);
    }
}
