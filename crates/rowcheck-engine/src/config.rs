use crate::error::{EngineError, EngineResult};
use std::num::NonZeroUsize;
use std::thread;

/// Configuration for a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of concurrent validation workers.
    ///
    /// `None` means one worker per available processing core.
    pub workers: Option<NonZeroUsize>,
}

impl EngineConfig {
    /// Fixed worker count, mostly useful for deterministic tests
    pub fn with_workers(workers: NonZeroUsize) -> Self {
        Self {
            workers: Some(workers),
        }
    }

    /// Build from a raw, user-supplied count; `Some(0)` is rejected
    pub fn from_worker_count(workers: Option<usize>) -> EngineResult<Self> {
        match workers {
            None => Ok(Self::default()),
            Some(count) => NonZeroUsize::new(count)
                .map(Self::with_workers)
                .ok_or_else(|| EngineError::InvalidConfig("workers must be at least 1".to_string())),
        }
    }

    /// The worker count this run will actually use (always at least 1)
    pub fn resolved_workers(&self) -> NonZeroUsize {
        self.workers.unwrap_or_else(available_cores)
    }
}

/// Number of processing cores the OS reports, falling back to 1
pub fn available_cores() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
