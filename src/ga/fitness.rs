//! Completion-time cost model.
//!
//! Each worker is modelled as a single queue executing its jobs back to back
//! at constant speed, so a job costs `length / speed` and a chromosome costs
//! the sum over all its jobs. Worker-level parallelism is not modelled.
//!
//! Speeds are validated when a [`Worker`](crate::models::Worker) is built,
//! so no division guard is needed here.

use rayon::prelude::*;

use super::Snapshot;
use super::chromosome::{Chromosome, FlatGene, GroupedGene};

/// Σ `job.length / worker.speed` over flat genes.
pub fn flat_cost(genes: &[FlatGene], snapshot: &Snapshot) -> f64 {
    genes
        .iter()
        .map(|g| {
            snapshot
                .worker(g.worker)
                .execution_time(snapshot.job(g.job()).length())
        })
        .sum()
}

/// Σ over grouped genes of `(Σ job.length) / worker.speed`.
pub fn grouped_cost(genes: &[GroupedGene], snapshot: &Snapshot) -> f64 {
    genes.iter().map(|g| gene_load(g, snapshot)).sum()
}

/// Busy time of one grouped gene's worker.
pub fn gene_load(gene: &GroupedGene, snapshot: &Snapshot) -> f64 {
    let total: f64 = gene.jobs.iter().map(|&j| snapshot.job(j).length()).sum();
    snapshot.worker(gene.worker).execution_time(total)
}

/// Evaluates and caches the fitness of every chromosome.
///
/// With `parallel` set the work is spread over the rayon pool; the result is
/// identical to the sequential pass.
pub fn evaluate_population<C: Chromosome>(population: &mut [C], snapshot: &Snapshot, parallel: bool) {
    if parallel {
        population.par_iter_mut().for_each(|c| {
            let f = c.evaluate(snapshot);
            c.set_fitness(f);
        });
    } else {
        for c in population.iter_mut() {
            let f = c.evaluate(snapshot);
            c.set_fitness(f);
        }
    }
}

/// Index of the lowest cached fitness. Ties: first occurrence wins.
pub fn fittest_index<C: Chromosome>(population: &[C]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in population.iter().enumerate() {
        let f = c.fitness();
        match best {
            Some((_, bf)) if f >= bf => {}
            _ => best = Some((i, f)),
        }
    }
    best.map(|(i, _)| i)
}

/// Mean of cached fitness values (0.0 for an empty population).
pub fn mean_fitness<C: Chromosome>(population: &[C]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|c| c.fitness()).sum::<f64>() / population.len() as f64
}
