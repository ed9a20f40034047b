//! Error types for placement runs.

use thiserror::Error;

use crate::models::{JobId, WorkerId};
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors raised while preparing or running a placement.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    /// No jobs or no workers were supplied.
    #[error("empty input: {jobs} job(s), {workers} worker(s)")]
    EmptyInput { jobs: usize, workers: usize },

    /// The population initializer was handed an empty worker list.
    #[error("no workers available for population initialization")]
    NoWorkersAvailable,

    /// A worker was constructed with a non-positive or non-finite speed.
    #[error("worker {worker_id} has invalid speed {speed}")]
    InvalidWorkerSpeed { worker_id: WorkerId, speed: f64 },

    /// A job was constructed with a negative or non-finite length.
    #[error("job {job_id} has invalid length {length}")]
    InvalidJobLength { job_id: JobId, length: f64 },

    /// A pre-bound job references a worker absent from the snapshot.
    ///
    /// Not fatal: the job is postponed and reported in the assignment.
    #[error("job {job_id} is bound to unavailable worker {worker_id}")]
    UnresolvedBinding { job_id: JobId, worker_id: WorkerId },

    /// A job was lost or duplicated between input and extracted assignment.
    #[error("assignment invariant violated: {0}")]
    InvariantViolation(String),

    /// The GA configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Structural problems in the submitted batch.
    #[error("input validation failed with {} finding(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// A binding referenced a job the broker has never seen.
    #[error("unknown job {0}")]
    UnknownJob(JobId),
}

impl SchedulerError {
    /// Whether the batch can still proceed after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SchedulerError::UnresolvedBinding { .. })
    }
}
