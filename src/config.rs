use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::pool::{DEFAULT_POOL_WORKERS, MAX_WORKERS};
use crate::prodcons::ProducerMode;

pub const DEFAULT_LEN: usize = 20;
pub const DEFAULT_LO: i32 = 1;
pub const DEFAULT_HI: i32 = 100;

/// Knobs for one comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of generated integers.
    pub len: usize,
    /// Inclusive lower bound of generated values.
    pub lo: i32,
    /// Inclusive upper bound of generated values.
    pub hi: i32,
    pub pool_workers: usize,
    pub atomic_workers: usize,
    pub parallel_threads: usize,
    pub producer_mode: ProducerMode,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            lo: DEFAULT_LO,
            hi: DEFAULT_HI,
            pool_workers: DEFAULT_POOL_WORKERS,
            atomic_workers: 1,
            parallel_threads: num_cpus::get().clamp(1, MAX_WORKERS),
            producer_mode: ProducerMode::default(),
            seed: None,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lo > self.hi {
            return Err(HarnessError::invalid_config(
                "range",
                format!("lower bound {} is greater than upper bound {}", self.lo, self.hi),
            ));
        }
        for (field, value) in [
            ("pool_workers", self.pool_workers),
            ("atomic_workers", self.atomic_workers),
            ("parallel_threads", self.parallel_threads),
        ] {
            if value == 0 {
                return Err(HarnessError::invalid_config(field, "must be at least 1"));
            }
            if value > MAX_WORKERS {
                return Err(HarnessError::invalid_config(
                    field,
                    format!("must be at most {MAX_WORKERS}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = HarnessConfig::default();
        assert_eq!((config.len, config.lo, config.hi), (20, 1, 100));
        assert_eq!(config.pool_workers, 4);
        assert_eq!(config.atomic_workers, 1);
        assert_eq!(config.producer_mode, ProducerMode::Serialized);
        assert!(config.parallel_threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let config = HarnessConfig {
            lo: 10,
            hi: 1,
            ..HarnessConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig { field: "range", .. })
        ));
    }

    #[test]
    fn test_zero_workers_are_rejected() {
        let config = HarnessConfig {
            atomic_workers: 0,
            ..HarnessConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig { field: "atomic_workers", .. })
        ));
    }

    #[test]
    fn test_oversized_worker_counts_are_rejected() {
        for config in [
            HarnessConfig {
                pool_workers: usize::MAX,
                ..HarnessConfig::default()
            },
            HarnessConfig {
                atomic_workers: MAX_WORKERS + 1,
                ..HarnessConfig::default()
            },
            HarnessConfig {
                parallel_threads: usize::MAX,
                ..HarnessConfig::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(HarnessError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn test_empty_input_is_allowed() {
        let config = HarnessConfig {
            len: 0,
            ..HarnessConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
