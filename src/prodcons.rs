//! One producer, one consumer, one mutex-guarded queue.
//!
//! The consumer sleeps on the queue's condition variable instead of polling
//! and never holds the lock while idle. It finishes when the queue is empty
//! and the producer has set the completion flag.
//!
//! In [`ProducerMode::Serialized`] the producer holds the lock for its whole
//! push phase and sets the flag before releasing it, so the consumer cannot
//! start until production is over. [`ProducerMode::Interleaved`] takes the
//! lock once per element and lets the two threads overlap.

use std::fmt;
use std::str::FromStr;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::kernel::fold_odd;
use crate::queue::SyncQueue;
use crate::worker;

const PRODUCER: &str = "producer";
const CONSUMER: &str = "consumer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerMode {
    #[default]
    Serialized,
    Interleaved,
}

impl ProducerMode {
    pub const NAMES: [&'static str; 2] = ["serialized", "interleaved"];

    pub fn as_str(self) -> &'static str {
        match self {
            ProducerMode::Serialized => "serialized",
            ProducerMode::Interleaved => "interleaved",
        }
    }
}

impl fmt::Display for ProducerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProducerMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "serialized" => Ok(ProducerMode::Serialized),
            "interleaved" => Ok(ProducerMode::Interleaved),
            other => Err(HarnessError::invalid_config(
                "producer_mode",
                format!("unknown mode '{other}', expected one of {:?}", Self::NAMES),
            )),
        }
    }
}

/// What the consumer saw while draining the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumption {
    pub max: Option<i32>,
    pub popped: usize,
    /// Elements taken before the completion flag was set.
    pub popped_while_open: usize,
}

/// Closes the queue even if the producer unwinds, so the consumer never
/// waits for a flag that will not come.
struct CloseOnDrop<'a, T>(&'a SyncQueue<T>);

impl<T> Drop for CloseOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn produce(queue: &SyncQueue<i32>, data: &[i32], mode: ProducerMode) {
    let _guard = CloseOnDrop(queue);
    match mode {
        ProducerMode::Serialized => queue.fill_and_close(data.iter().copied()),
        ProducerMode::Interleaved => {
            for &value in data {
                queue.push(value);
            }
        }
    }
}

fn consume(queue: &SyncQueue<i32>) -> Consumption {
    let mut consumption = Consumption {
        max: None,
        popped: 0,
        popped_while_open: 0,
    };

    while let Some((value, closed)) = queue.pop_wait_with_flag() {
        consumption.popped += 1;
        if !closed {
            consumption.popped_while_open += 1;
        }
        consumption.max = fold_odd(consumption.max, value);
    }

    consumption
}

/// Runs the producer and consumer to completion and returns what the
/// consumer observed.
pub fn run_producer_consumer(data: &[i32], mode: ProducerMode) -> Result<Consumption> {
    let queue = SyncQueue::new();

    let consumption = thread::scope(|s| {
        let producer = worker::spawn(s, PRODUCER, || produce(&queue, data, mode))?;
        let consumer = worker::spawn(s, CONSUMER, || consume(&queue))?;

        let produced = producer.join();
        let consumed = consumer.join();
        produced?;
        consumed
    })?;

    debug!(
        %mode,
        popped = consumption.popped,
        popped_while_open = consumption.popped_while_open,
        "consumer finished"
    );
    Ok(consumption)
}

pub fn max_with_producer_consumer(data: &[i32], mode: ProducerMode) -> Result<Option<i32>> {
    run_producer_consumer(data, mode).map(|c| c.max)
}
