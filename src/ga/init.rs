//! Initial population builders.
//!
//! # Flat rotation
//!
//! With jobs sorted by ascending length and workers by descending speed,
//! chromosome `j` binds job `i` to worker `(i + j) mod W`. Generating
//! `J * W` chromosomes enumerates every cyclic offset of the round-robin
//! assignment, so the initial population is diverse without any randomness.
//!
//! # Grouped blocks
//!
//! The job list is cut into `W` contiguous blocks of `⌊J / W⌋` jobs, the
//! last block absorbing the remainder. Job and worker orders are reshuffled
//! before every chromosome, so each chromosome pairs different job blocks
//! with different workers.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::Snapshot;
use super::chromosome::{FlatChromosome, FlatGene, GroupedChromosome, GroupedGene};
use crate::error::{Result, SchedulerError};

/// A population of grouped chromosomes treated as one outer individual.
pub type ChromosomeSet = Vec<GroupedChromosome>;

/// Builds the deterministic `J * W` rotation population.
pub fn rotation_population(snapshot: &Snapshot) -> Result<Vec<FlatChromosome>> {
    let num_jobs = snapshot.job_count();
    let num_workers = snapshot.worker_count();
    if num_workers == 0 {
        return Err(SchedulerError::NoWorkersAvailable);
    }

    let population: Vec<FlatChromosome> = (0..num_jobs * num_workers)
        .map(|j| {
            let genes = (0..num_jobs)
                .map(|i| FlatGene::new(i, (i + j) % num_workers))
                .collect();
            FlatChromosome::new(genes)
        })
        .collect();

    debug!(
        chromosomes = population.len(),
        jobs = num_jobs,
        workers = num_workers,
        "rotation population built"
    );
    Ok(population)
}

/// Partitions `job_order` into one contiguous block per entry of
/// `worker_order`.
pub fn block_chromosome(job_order: &[usize], worker_order: &[usize]) -> Result<GroupedChromosome> {
    let num_workers = worker_order.len();
    if num_workers == 0 {
        return Err(SchedulerError::NoWorkersAvailable);
    }
    let block = job_order.len() / num_workers;

    let genes = worker_order
        .iter()
        .enumerate()
        .map(|(i, &worker)| {
            let start = i * block;
            let end = if i == num_workers - 1 {
                job_order.len()
            } else {
                (i + 1) * block
            };
            GroupedGene::new(worker, job_order[start..end].to_vec())
        })
        .collect();
    Ok(GroupedChromosome::new(genes))
}

/// Builds one grouped chromosome from freshly shuffled job and worker orders.
///
/// The orders are carried across calls so each shuffle starts from the
/// previous permutation.
pub fn shuffled_chromosome<R: Rng>(
    job_order: &mut [usize],
    worker_order: &mut [usize],
    rng: &mut R,
) -> Result<GroupedChromosome> {
    worker_order.shuffle(rng);
    job_order.shuffle(rng);
    block_chromosome(job_order, worker_order)
}

/// Builds `size` shuffled grouped chromosomes.
pub fn grouped_population<R: Rng>(
    snapshot: &Snapshot,
    size: usize,
    rng: &mut R,
) -> Result<Vec<GroupedChromosome>> {
    let mut job_order: Vec<usize> = (0..snapshot.job_count()).collect();
    let mut worker_order: Vec<usize> = (0..snapshot.worker_count()).collect();
    (0..size)
        .map(|_| shuffled_chromosome(&mut job_order, &mut worker_order, rng))
        .collect()
}

/// Builds `set_count` chromosome-sets of `per_set` shuffled chromosomes.
pub fn chromosome_sets<R: Rng>(
    snapshot: &Snapshot,
    set_count: usize,
    per_set: usize,
    rng: &mut R,
) -> Result<Vec<ChromosomeSet>> {
    let mut job_order: Vec<usize> = (0..snapshot.job_count()).collect();
    let mut worker_order: Vec<usize> = (0..snapshot.worker_count()).collect();
    let sets = (0..set_count)
        .map(|_| {
            (0..per_set)
                .map(|_| shuffled_chromosome(&mut job_order, &mut worker_order, rng))
                .collect::<Result<ChromosomeSet>>()
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(sets = set_count, per_set, "chromosome sets built");
    Ok(sets)
}
