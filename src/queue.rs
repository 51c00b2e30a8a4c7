//! Mutex-guarded FIFO with a completion flag.
//!
//! Every access to the items or the flag goes through the same lock. Waiting
//! consumers sleep on a condition variable, which releases the lock while
//! they are idle.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

#[derive(Debug)]
pub struct SyncQueue<T> {
    state: Mutex<QueueState<T>>,
    ready: Condvar,
}

impl<T> SyncQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    // A panicking worker is reported at its join point; the queue contents
    // are still consistent, so poisoning is ignored here.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().items.push_back(item);
        self.ready.notify_one();
    }

    /// Pushes every item and sets the completion flag under a single lock
    /// acquisition. Nobody can pop until the whole batch is in.
    pub fn fill_and_close<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = self.lock();
        state.items.extend(items);
        state.closed = true;
        drop(state);
        self.ready.notify_all();
    }

    /// Sets the completion flag. Items already queued can still be popped.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Pops the front item without waiting.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Pops the front item, sleeping while the queue is empty but still open.
    /// Returns `None` once the queue is both empty and closed.
    pub fn pop_wait(&self) -> Option<T> {
        self.pop_wait_with_flag().map(|(item, _)| item)
    }

    /// Like [`pop_wait`](Self::pop_wait), but also reports whether the
    /// completion flag was already set when the item was taken.
    pub fn pop_wait_with_flag(&self) -> Option<(T, bool)> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some((item, state.closed));
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<T> Default for SyncQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SyncQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: iter.into_iter().collect(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }
}
