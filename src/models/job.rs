//! Job model.
//!
//! A job is an independent unit of work with a fixed size, executed by
//! exactly one worker. The broker creates jobs, the placement engine only
//! decides (and finally records) which worker runs each one.

use serde::{Deserialize, Serialize};

use super::WorkerId;
use crate::error::{Result, SchedulerError};

/// Job identifier.
pub type JobId = u32;

/// A job to be placed on a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJob")]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Work units to execute (>= 0).
    length: f64,
    /// Processing elements requested. Preserved, ignored by the cost model.
    pub resource_demand: u32,
    /// Worker this job is bound to. `None` = unbound.
    pub assigned_worker: Option<WorkerId>,
}

#[derive(Deserialize)]
struct RawJob {
    id: JobId,
    length: f64,
    #[serde(default = "default_demand")]
    resource_demand: u32,
    #[serde(default)]
    assigned_worker: Option<WorkerId>,
}

fn default_demand() -> u32 {
    1
}

impl TryFrom<RawJob> for Job {
    type Error = SchedulerError;

    fn try_from(raw: RawJob) -> Result<Self> {
        let mut job = Job::new(raw.id, raw.length)?.with_resource_demand(raw.resource_demand);
        job.assigned_worker = raw.assigned_worker;
        Ok(job)
    }
}

impl Job {
    /// Creates an unbound job.
    ///
    /// Fails with [`SchedulerError::InvalidJobLength`] for negative or
    /// non-finite lengths.
    pub fn new(id: JobId, length: f64) -> Result<Self> {
        if !length.is_finite() || length < 0.0 {
            return Err(SchedulerError::InvalidJobLength { job_id: id, length });
        }
        Ok(Self {
            id,
            length,
            resource_demand: 1,
            assigned_worker: None,
        })
    }

    /// Sets the processing element demand.
    pub fn with_resource_demand(mut self, demand: u32) -> Self {
        self.resource_demand = demand;
        self
    }

    /// Pre-binds this job to a worker, bypassing GA placement.
    pub fn bound_to(mut self, worker_id: WorkerId) -> Self {
        self.assigned_worker = Some(worker_id);
        self
    }

    /// Work units to execute.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Whether the job carries a worker binding.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.assigned_worker.is_some()
    }
}
