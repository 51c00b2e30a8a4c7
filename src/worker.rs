//! Named scoped workers.
//!
//! Thread creation failures and panics are turned into [`HarnessError`]s at
//! the spawn and join points instead of unwrapping them.

use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::debug;

use crate::error::{HarnessError, Result};

/// A spawned worker together with the name used in logs and errors.
pub struct Worker<'scope, T> {
    name: String,
    handle: ScopedJoinHandle<'scope, T>,
}

impl<'scope, T> Worker<'scope, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the worker to exit and returns what it produced.
    pub fn join(self) -> Result<T> {
        let value = self
            .handle
            .join()
            .map_err(|_| HarnessError::panicked(self.name.as_str()))?;
        debug!(worker = %self.name, "joined");
        Ok(value)
    }
}

pub fn spawn<'scope, 'env, F, T>(
    scope: &'scope Scope<'scope, 'env>,
    name: impl Into<String>,
    f: F,
) -> Result<Worker<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    let name = name.into();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, f)
        .map_err(|e| HarnessError::spawn(name.as_str(), e))?;
    debug!(worker = %name, "spawned");
    Ok(Worker { name, handle })
}

/// Joins every worker, even after one of them has failed, and reports the
/// first failure.
pub fn join_all<T>(workers: Vec<Worker<'_, T>>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(workers.len());
    let mut first_error = None;

    for worker in workers {
        match worker.join() {
            Ok(value) => values.push(value),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(values),
    }
}
