//! Assignment extraction.
//!
//! Turns the fittest chromosome back into parallel job and worker lists,
//! `jobs[k]` running on `workers[k]`. Flat chromosomes are walked gene by
//! gene; grouped chromosomes are flattened group by group, repeating the
//! worker once per job and keeping the order inside each group.
//!
//! Extraction is the last point where a lost or duplicated job can be
//! caught, so the job multiset is checked against the snapshot every time.

use super::Snapshot;
use super::chromosome::Chromosome;
use crate::error::{Result, SchedulerError};
use crate::models::{Job, Worker};

/// Parallel job/worker lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Jobs in dispatch order.
    pub jobs: Vec<Job>,
    /// Worker for each job, same length as `jobs`.
    pub workers: Vec<Worker>,
}

impl Extraction {
    /// Number of job→worker pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no pair was extracted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterates `(job, worker)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Job, &Worker)> {
        self.jobs.iter().zip(&self.workers)
    }
}

/// Extracts the job→worker lists of a chromosome.
///
/// Fails with [`SchedulerError::InvariantViolation`] if a job is missing,
/// duplicated, or an index falls outside the snapshot.
pub fn extract<C: Chromosome>(chromosome: &C, snapshot: &Snapshot) -> Result<Extraction> {
    let placements = chromosome.placements();
    let mut seen = vec![false; snapshot.job_count()];
    let mut jobs = Vec::with_capacity(placements.len());
    let mut workers = Vec::with_capacity(placements.len());

    for (job, worker) in placements {
        if worker >= snapshot.worker_count() {
            return Err(SchedulerError::InvariantViolation(format!(
                "worker index {worker} outside snapshot of {}",
                snapshot.worker_count()
            )));
        }
        match seen.get_mut(job) {
            None => {
                return Err(SchedulerError::InvariantViolation(format!(
                    "job index {job} outside snapshot of {}",
                    snapshot.job_count()
                )));
            }
            Some(true) => {
                return Err(SchedulerError::InvariantViolation(format!(
                    "job {} extracted twice",
                    snapshot.job(job).id
                )));
            }
            Some(flag) => *flag = true,
        }
        jobs.push(snapshot.job(job).clone());
        workers.push(snapshot.worker(worker).clone());
    }

    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(SchedulerError::InvariantViolation(format!(
            "job {} lost during evolution",
            snapshot.job(missing).id
        )));
    }

    Ok(Extraction { jobs, workers })
}
