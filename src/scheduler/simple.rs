//! Round-robin placement baseline.
//!
//! # Algorithm
//!
//! 1. Keep the submission order of jobs and workers.
//! 2. Dispatch pre-bound jobs to their worker; postpone them if the worker
//!    is missing.
//! 3. Hand every unbound job to the next worker in cyclic order.
//!
//! # Complexity
//! O(n + m) where n=jobs, m=workers.

use std::collections::HashSet;

use tracing::warn;

use super::PlacementPolicy;
use crate::error::{Result, SchedulerError};
use crate::models::{Assignment, Job, Worker, WorkerId};

/// Cyclic job-to-worker placement.
///
/// Provides the reference placement the GA is measured against.
///
/// # Example
///
/// ```
/// use ga_placement::models::{Job, Worker};
/// use ga_placement::scheduler::{PlacementPolicy, RoundRobinScheduler};
///
/// let mut jobs = vec![
///     Job::new(0, 10.0).unwrap(),
///     Job::new(1, 20.0).unwrap(),
///     Job::new(2, 30.0).unwrap(),
/// ];
/// let workers = vec![Worker::new(5, 1.0).unwrap(), Worker::new(6, 1.0).unwrap()];
/// let a = RoundRobinScheduler::new().schedule(&mut jobs, &workers).unwrap();
/// assert_eq!(a.to_parallel_lists().1, vec![5, 6, 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoundRobinScheduler;

impl RoundRobinScheduler {
    /// Creates a new scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for RoundRobinScheduler {
    fn schedule(&self, jobs: &mut [Job], workers: &[Worker]) -> Result<Assignment> {
        if jobs.is_empty() || workers.is_empty() {
            return Err(SchedulerError::EmptyInput {
                jobs: jobs.len(),
                workers: workers.len(),
            });
        }

        let worker_ids: HashSet<WorkerId> = workers.iter().map(|w| w.id).collect();
        let mut assignment = Assignment::new();
        let mut next = 0;

        for job in jobs.iter() {
            match job.assigned_worker {
                None => {
                    assignment.add_dispatch(job.id, workers[next].id);
                    next = (next + 1) % workers.len();
                }
                Some(worker_id) if worker_ids.contains(&worker_id) => {
                    assignment.add_dispatch(job.id, worker_id);
                }
                Some(worker_id) => {
                    warn!(job = job.id, worker = worker_id, "bound worker not available, postponing");
                    assignment.add_postponed(job.id, worker_id);
                }
            }
        }

        assignment.tag_jobs(jobs);
        Ok(assignment)
    }
}
