//! Worker model.
//!
//! Workers are the processing resources jobs run on. Each worker executes
//! at a constant speed (work units per time unit). A worker's speed is
//! validated once at construction so that the fitness model can divide by
//! it unconditionally.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Worker identifier.
pub type WorkerId = u32;

/// A processing resource with constant throughput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWorker")]
pub struct Worker {
    /// Unique worker identifier.
    pub id: WorkerId,
    /// Work units per time unit (> 0).
    speed: f64,
}

#[derive(Deserialize)]
struct RawWorker {
    id: WorkerId,
    speed: f64,
}

impl TryFrom<RawWorker> for Worker {
    type Error = SchedulerError;

    fn try_from(raw: RawWorker) -> Result<Self> {
        Worker::new(raw.id, raw.speed)
    }
}

impl Worker {
    /// Creates a worker.
    ///
    /// Fails with [`SchedulerError::InvalidWorkerSpeed`] when `speed <= 0`
    /// or is not finite.
    pub fn new(id: WorkerId, speed: f64) -> Result<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SchedulerError::InvalidWorkerSpeed {
                worker_id: id,
                speed,
            });
        }
        Ok(Self { id, speed })
    }

    /// Work units per time unit.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Time this worker needs for `length` work units.
    #[inline]
    pub fn execution_time(&self, length: f64) -> f64 {
        length / self.speed
    }
}
