//! Bounded pool for the heavy pipeline stages.
//!
//! Transcription and synthesis run through here so that however many
//! exchanges are in flight, at most `size` of those stages execute at once.
//! Callers beyond that wait in the semaphore's FIFO queue instead of piling
//! more load onto the engines.

use crate::error::ExchangeError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// # Panics
    /// Panics if `size` is 0.
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "WorkerPool size must be >= 1, got {}", size);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held by a running job.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` once a permit is free. The permit is released when the job
    /// finishes, whether it succeeded or not.
    pub async fn run<F, T>(&self, stage: &str, job: F) -> Result<T, ExchangeError>
    where
        F: Future<Output = T>,
    {
        if self.permits.available_permits() == 0 {
            debug!("{}: waiting for a free worker ({} busy)", stage, self.size);
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExchangeError::PoolClosed)?;

        Ok(job.await)
    }

    /// Stop admitting new jobs. Jobs already running finish normally.
    pub fn close(&self) {
        self.permits.close();
    }
}
