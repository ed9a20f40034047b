//! Assignment (solution) model.
//!
//! An assignment is the placement decision handed back to the broker: an
//! ordered list of job→worker dispatches plus the jobs that had to be
//! postponed because their pre-bound worker is not available.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Job, JobId, WorkerId};
use crate::config::Representation;

/// A complete placement decision for one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Jobs to submit, in submission order.
    pub dispatches: Vec<Dispatch>,
    /// Pre-bound jobs whose worker is missing from the snapshot.
    pub postponed: Vec<Postponed>,
    /// Fitness of the winning chromosome. `None` if the GA did not run.
    pub fitness: Option<f64>,
    /// Encoding used by the GA run, if any.
    pub representation: Option<Representation>,
}

/// A job→worker dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dispatch {
    /// Job to run.
    pub job_id: JobId,
    /// Worker that runs it.
    pub worker_id: WorkerId,
}

/// A pre-bound job that could not be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postponed {
    /// Waiting job.
    pub job_id: JobId,
    /// Worker it is bound to.
    pub worker_id: WorkerId,
}

/// Final state of a job reported back by the execution substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Executed to completion.
    Success,
    /// Execution failed.
    Failed,
}

/// Completion record delivered through the broker's completion callback.
///
/// Timing fields are filled by the substrate, never by the GA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Completed job.
    pub job_id: JobId,
    /// Worker that ran it.
    pub worker_id: WorkerId,
    /// Completion status.
    pub status: JobStatus,
    /// Execution start time.
    pub start_time: f64,
    /// Execution finish time.
    pub finish_time: f64,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dispatch.
    pub fn add_dispatch(&mut self, job_id: JobId, worker_id: WorkerId) {
        self.dispatches.push(Dispatch { job_id, worker_id });
    }

    /// Records a postponed job.
    pub fn add_postponed(&mut self, job_id: JobId, worker_id: WorkerId) {
        self.postponed.push(Postponed { job_id, worker_id });
    }

    /// Number of dispatched jobs.
    #[inline]
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.len()
    }

    /// Worker chosen for a job, if dispatched.
    pub fn worker_for(&self, job_id: JobId) -> Option<WorkerId> {
        self.dispatches
            .iter()
            .find(|d| d.job_id == job_id)
            .map(|d| d.worker_id)
    }

    /// Dispatched job IDs grouped by worker, each group in dispatch order.
    pub fn jobs_by_worker(&self) -> HashMap<WorkerId, Vec<JobId>> {
        let mut map: HashMap<WorkerId, Vec<JobId>> = HashMap::new();
        for d in &self.dispatches {
            map.entry(d.worker_id).or_default().push(d.job_id);
        }
        map
    }

    /// Parallel job/worker ID lists (`jobs[k]` runs on `workers[k]`).
    pub fn to_parallel_lists(&self) -> (Vec<JobId>, Vec<WorkerId>) {
        self.dispatches
            .iter()
            .map(|d| (d.job_id, d.worker_id))
            .unzip()
    }

    /// Records each dispatched job's worker on the matching entry of `jobs`.
    ///
    /// Jobs without a dispatch keep their current binding.
    pub fn tag_jobs(&self, jobs: &mut [Job]) {
        let chosen: HashMap<JobId, WorkerId> = self
            .dispatches
            .iter()
            .map(|d| (d.job_id, d.worker_id))
            .collect();
        for job in jobs.iter_mut() {
            if let Some(&worker_id) = chosen.get(&job.id) {
                job.assigned_worker = Some(worker_id);
            }
        }
    }
}

impl JobOutcome {
    /// Wall time spent executing.
    #[inline]
    pub fn execution_time(&self) -> f64 {
        self.finish_time - self.start_time
    }
}
