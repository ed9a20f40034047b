//! Placement policies and KPI evaluation.
//!
//! A [`PlacementPolicy`] turns a batch of jobs and workers into an
//! [`Assignment`]. Two policies are provided:
//!
//! - [`GaScheduler`]: genetic search over job→worker placements.
//! - [`RoundRobinScheduler`]: cyclic baseline.
//!
//! # KPI
//!
//! [`AssignmentKpi`] computes load metrics for any assignment: per-worker
//! busy time, makespan, total cost and utilization.

mod ga;
mod kpi;
mod simple;

pub use ga::{GaScheduler, Placement};
pub use kpi::AssignmentKpi;
pub use simple::RoundRobinScheduler;

use crate::error::Result;
use crate::models::{Assignment, Job, Worker};

/// Maps a batch of jobs onto a batch of workers.
pub trait PlacementPolicy {
    /// Places every job.
    ///
    /// Pre-bound jobs keep their worker. Jobs bound to a worker missing
    /// from `workers` end up in [`Assignment::postponed`]. Every dispatched
    /// job has `assigned_worker` set on return.
    fn schedule(&self, jobs: &mut [Job], workers: &[Worker]) -> Result<Assignment>;
}
