use std::io;
use thiserror::Error;

/// Everything that can abort a comparison run.
///
/// Empty input and inputs without odd values are not errors; every strategy
/// answers `None` for them.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to spawn worker '{worker}': {source}")]
    Spawn {
        worker: String,
        #[source]
        source: io::Error,
    },

    #[error("worker '{worker}' panicked before producing a result")]
    WorkerPanicked { worker: String },

    #[error("failed to build the data-parallel thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("promise was dropped by its producer without a value")]
    PromiseBroken,

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl HarnessError {
    pub fn spawn(worker: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            worker: worker.into(),
            source,
        }
    }

    pub fn panicked(worker: impl Into<String>) -> Self {
        Self::WorkerPanicked {
            worker: worker.into(),
        }
    }

    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_names_worker() {
        let err = HarnessError::spawn("pool-worker-2", io::Error::new(io::ErrorKind::Other, "no threads"));
        let message = err.to_string();
        assert!(message.contains("pool-worker-2"));
        assert!(message.contains("no threads"));
    }

    #[test]
    fn test_serialization_failure_converts() {
        let source = serde_json::from_str::<i32>("not json").unwrap_err();
        let err = HarnessError::from(source);
        assert!(matches!(err, HarnessError::Serialize(_)));
        assert!(err.to_string().starts_with("failed to serialize report"));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = HarnessError::invalid_config("pool_workers", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration for 'pool_workers': must be at least 1"
        );
    }
}
