//! The comparison pass: every strategy, in a fixed order, over one input.

use std::fmt;
use std::time::{Duration, Instant};

use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::atomic::max_with_atomic_workers;
use crate::config::HarnessConfig;
use crate::data_parallel::max_with_rayon;
use crate::error::Result;
use crate::pool::max_with_thread_pool;
use crate::prodcons::max_with_producer_consumer;
use crate::single::{max_with_native_thread, max_with_os_thread, max_with_promise};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    OsThread,
    NativeThread,
    Promise,
    Atomic,
    ThreadPool,
    ProducerConsumer,
    DataParallel,
}

impl Strategy {
    /// Report order.
    pub const ALL: [Strategy; 7] = [
        Strategy::OsThread,
        Strategy::NativeThread,
        Strategy::Promise,
        Strategy::Atomic,
        Strategy::ThreadPool,
        Strategy::ProducerConsumer,
        Strategy::DataParallel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::OsThread => "OS thread",
            Strategy::NativeThread => "std::thread",
            Strategy::Promise => "promise",
            Strategy::Atomic => "atomic",
            Strategy::ThreadPool => "safe queue pool",
            Strategy::ProducerConsumer => "producer/consumer",
            Strategy::DataParallel => "rayon",
        }
    }

    /// 1-based position in [`Strategy::ALL`].
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn run(self, data: &[i32], config: &HarnessConfig) -> Result<Option<i32>> {
        match self {
            Strategy::OsThread => max_with_os_thread(data),
            Strategy::NativeThread => max_with_native_thread(data),
            Strategy::Promise => max_with_promise(data),
            Strategy::Atomic => max_with_atomic_workers(data, config.atomic_workers),
            Strategy::ThreadPool => max_with_thread_pool(data, config.pool_workers),
            Strategy::ProducerConsumer => max_with_producer_consumer(data, config.producer_mode),
            Strategy::DataParallel => max_with_rayon(data, config.parallel_threads),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub strategy: Strategy,
    pub max_odd: Option<i32>,
    #[serde(serialize_with = "serialize_micros", rename = "elapsed_us")]
    pub elapsed: Duration,
}

fn serialize_micros<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}

/// Results of one comparison pass, in [`Strategy::ALL`] order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub data: Vec<i32>,
    pub outcomes: Vec<Outcome>,
}

impl Report {
    /// True when every strategy produced the same answer.
    pub fn is_consistent(&self) -> bool {
        self.outcomes.iter().map(|o| o.max_odd).all_equal()
    }

    pub fn render(&self, timings: bool) -> String {
        let mut out = format!("Array: {}\n\n", self.data.iter().join(" "));
        for outcome in &self.outcomes {
            let head = format!(
                "{}. Max odd ({})",
                outcome.strategy.number(),
                outcome.strategy.label()
            );
            let value = match outcome.max_odd {
                Some(v) => v.to_string().as_str().green(),
                None => "no odd value".yellow(),
            };
            out.push_str(&format!("{head:<33}: {value}"));
            if timings {
                out.push_str(&format!("  ({:?})", outcome.elapsed).as_str().dimmed().to_string());
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Runs all seven strategies over `data`. The first failure aborts the pass.
pub fn run_all(data: Vec<i32>, config: &HarnessConfig) -> Result<Report> {
    config.validate()?;

    let mut outcomes = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        let _span = info_span!("strategy", name = strategy.label()).entered();
        let start = Instant::now();
        let max_odd = strategy.run(&data, config)?;
        let elapsed = start.elapsed();
        debug!(?max_odd, ?elapsed, "done");
        outcomes.push(Outcome {
            strategy,
            max_odd,
            elapsed,
        });
    }

    let report = Report { data, outcomes };
    info!(
        len = report.data.len(),
        consistent = report.is_consistent(),
        "comparison pass complete"
    );
    Ok(report)
}
