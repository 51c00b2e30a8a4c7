//! Seven ways to find the largest odd number in a slice.
//!
//! Every strategy reduces the same read-only input with a different
//! coordination pattern and must agree with [`kernel::find_max_odd`]:
//!
//! 1. a dedicated OS thread writing a shared slot ([`single::max_with_os_thread`])
//! 2. a thread writing through an output reference ([`single::max_with_native_thread`])
//! 3. a single-use promise ([`single::max_with_promise`])
//! 4. compare-and-swap accumulation ([`atomic::max_with_atomic`])
//! 5. a pre-filled queue drained by a thread pool ([`pool::max_with_thread_pool`])
//! 6. a producer and a consumer sharing a locked queue ([`prodcons::max_with_producer_consumer`])
//! 7. a rayon fold/reduce ([`data_parallel::max_with_rayon`])
//!
//! ```
//! use max_odd_harness::{run_all, HarnessConfig};
//!
//! let report = run_all(vec![4, 7, 2, 9, 9, 6], &HarnessConfig::default()).unwrap();
//! assert!(report.outcomes.iter().all(|o| o.max_odd == Some(9)));
//! ```

pub mod atomic;
pub mod config;
pub mod data_parallel;
pub mod error;
pub mod generator;
pub mod harness;
pub mod kernel;
pub mod pool;
pub mod prodcons;
pub mod queue;
pub mod single;
pub mod worker;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use harness::{run_all, Outcome, Report, Strategy};
pub use kernel::find_max_odd;
pub use prodcons::ProducerMode;
