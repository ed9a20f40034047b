//! Run-scoped state of one placement run.
//!
//! The context owns sorted copies of the job and worker batch and the single
//! random source every operator draws from. Chromosomes refer to jobs and
//! workers by index into the snapshot.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{Result, SchedulerError};
use crate::models::{Job, Worker};

/// Sorted job/worker snapshot consumed by one evolution run.
///
/// Jobs are ordered by ascending length, workers by descending speed. Both
/// sorts are stable, so equal keys keep their submission order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    jobs: Vec<Job>,
    workers: Vec<Worker>,
}

impl Snapshot {
    /// Builds a snapshot from the broker's batch.
    ///
    /// Fails with [`SchedulerError::EmptyInput`] if either list is empty.
    pub fn new(jobs: &[Job], workers: &[Worker]) -> Result<Self> {
        if jobs.is_empty() || workers.is_empty() {
            return Err(SchedulerError::EmptyInput {
                jobs: jobs.len(),
                workers: workers.len(),
            });
        }
        let mut jobs = jobs.to_vec();
        jobs.sort_by(|a, b| a.length().total_cmp(&b.length()));
        let mut workers = workers.to_vec();
        workers.sort_by(|a, b| b.speed().total_cmp(&a.speed()));
        Ok(Self { jobs, workers })
    }

    /// Jobs, shortest first.
    #[inline]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Workers, fastest first.
    #[inline]
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Job at snapshot index.
    #[inline]
    pub fn job(&self, idx: usize) -> &Job {
        &self.jobs[idx]
    }

    /// Worker at snapshot index.
    #[inline]
    pub fn worker(&self, idx: usize) -> &Worker {
        &self.workers[idx]
    }

    /// Number of jobs.
    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of workers.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of workers that can receive a job in a one-job-per-worker
    /// round: `min(jobs, workers)`.
    pub fn active_worker_count(&self) -> usize {
        self.jobs.len().min(self.workers.len())
    }

    /// Slowest workers left over when there are more workers than jobs.
    pub fn idle_workers(&self) -> &[Worker] {
        &self.workers[self.active_worker_count()..]
    }

    /// Index of the fixed mutation target (the fastest worker).
    #[inline]
    pub fn reference_worker(&self) -> usize {
        0
    }
}

/// Snapshot plus the run's random source.
///
/// Fields are public so operators can borrow the snapshot immutably while
/// drawing from the random source.
#[derive(Debug)]
pub struct RunContext {
    /// Sorted batch.
    pub snapshot: Snapshot,
    /// Random source shared by every operator of the run.
    pub rng: StdRng,
}

impl RunContext {
    /// Creates a context, seeded from `seed` or from the OS.
    pub fn new(jobs: &[Job], workers: &[Worker], seed: Option<u64>) -> Result<Self> {
        let snapshot = Snapshot::new(jobs, workers)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { snapshot, rng })
    }
}
