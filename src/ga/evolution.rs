//! Generational evolution loop (flat variant).
//!
//! # Algorithm
//!
//! Each generation runs `Evaluating → Recombining → Mutating`:
//!
//! 1. **Evaluate** every chromosome; record the generation's best and mean
//!    and the running best over all generations.
//! 2. **Recombine**: `population_size` trials. Each picks two chromosomes
//!    uniformly with replacement and, with probability
//!    `crossover_probability`, swaps the worker of a random gene of parent A
//!    with the worker of a random gene of parent B. Parents are modified in
//!    place, so the population size never changes.
//! 3. **Mutate**: with probability `mutation_probability`, one random gene
//!    of one random chromosome is rebound to the reference worker (the
//!    fastest one). The target is fixed, not random.
//!
//! After `max_generations` generations a final evaluation pass picks the
//! fittest chromosome of the last population (first occurrence on ties).
//!
//! With `elite_count > 0` the best chromosomes are set aside before
//! recombination and written back over the worst ones after mutation, which
//! makes the per-generation best non-increasing.

use rand::Rng;
use tracing::{debug, info};

use super::Snapshot;
use super::chromosome::Chromosome;
use super::fitness::{evaluate_population, fittest_index, mean_fitness};
use crate::config::GaConfig;
use crate::error::{Result, SchedulerError};

/// Per-generation fitness summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number (0-based).
    pub generation: usize,
    /// Lowest fitness in the generation.
    pub best: f64,
    /// Mean fitness of the generation.
    pub mean: f64,
}

/// Outcome of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<C> {
    /// Fittest chromosome of the final evaluation pass.
    pub best: C,
    /// Its fitness.
    pub best_fitness: f64,
    /// Lowest fitness observed in any generation.
    pub running_best: f64,
    /// Generations executed.
    pub generations: usize,
    /// Statistics per generation, final pass excluded.
    pub history: Vec<GenerationStats>,
}

/// Runs the generational loop over an initial population.
///
/// Fails with [`SchedulerError::EmptyInput`] when the population or its
/// chromosomes are empty.
pub fn evolve<C: Chromosome, R: Rng>(
    mut population: Vec<C>,
    snapshot: &Snapshot,
    config: &GaConfig,
    rng: &mut R,
) -> Result<EvolutionResult<C>> {
    let population_size = population.len();
    let slots = population.first().map_or(0, |c| c.slot_count());
    if population_size == 0 || slots == 0 {
        return Err(SchedulerError::EmptyInput {
            jobs: slots,
            workers: snapshot.worker_count(),
        });
    }

    let elite_count = config.elite_count.min(population_size);
    let mut history = Vec::with_capacity(config.max_generations);
    let mut running_best = f64::INFINITY;

    for generation in 0..config.max_generations {
        // Evaluating
        evaluate_population(&mut population, snapshot, config.parallel);
        let fittest = fittest_index(&population).unwrap_or(0);
        let best = population[fittest].fitness();
        let mean = mean_fitness(&population);
        if best < running_best {
            running_best = best;
        }
        history.push(GenerationStats {
            generation,
            best,
            mean,
        });
        debug!(generation, best, mean, fittest, "generation evaluated");

        let elites = select_elites(&population, elite_count);

        // Recombining
        for _ in 0..population_size {
            let a = rng.random_range(0..population_size);
            let b = rng.random_range(0..population_size);
            let p: f64 = rng.random();
            if p < config.crossover_probability {
                let i = rng.random_range(0..slots);
                let j = rng.random_range(0..slots);
                swap_workers(&mut population, a, i, b, j);
            }
        }

        // Mutating
        let p: f64 = rng.random();
        if p < config.mutation_probability {
            let c = rng.random_range(0..population_size);
            let g = rng.random_range(0..slots);
            population[c].reassign(g, snapshot.reference_worker());
        }

        if !elites.is_empty() {
            evaluate_population(&mut population, snapshot, config.parallel);
            restore_elites(&mut population, elites);
        }
    }

    // Final evaluation pass
    evaluate_population(&mut population, snapshot, config.parallel);
    let fittest = fittest_index(&population).unwrap_or(0);
    let best_fitness = population[fittest].fitness();
    running_best = running_best.min(best_fitness);

    info!(
        generations = config.max_generations,
        population = population_size,
        best_fitness,
        running_best,
        "flat evolution finished"
    );

    Ok(EvolutionResult {
        best: population.swap_remove(fittest),
        best_fitness,
        running_best,
        generations: config.max_generations,
        history,
    })
}

/// Exchanges the worker of gene `i` in chromosome `a` with the worker of
/// gene `j` in chromosome `b`. When `a == b` both rebinds hit the same
/// chromosome.
fn swap_workers<C: Chromosome>(population: &mut [C], a: usize, i: usize, b: usize, j: usize) {
    let (Some(wa), Some(wb)) = (population[a].worker_at(i), population[b].worker_at(j)) else {
        return;
    };
    population[a].reassign(i, wb);
    population[b].reassign(j, wa);
}

/// Clones the `count` fittest chromosomes (stable on ties).
fn select_elites<C: Chromosome>(population: &[C], count: usize) -> Vec<C> {
    if count == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&x, &y| population[x].fitness().total_cmp(&population[y].fitness()));
    order
        .into_iter()
        .take(count)
        .map(|i| population[i].clone())
        .collect()
}

/// Overwrites the worst chromosomes with the saved elites.
fn restore_elites<C: Chromosome>(population: &mut [C], elites: Vec<C>) {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&x, &y| population[y].fitness().total_cmp(&population[x].fitness()));
    for (slot, elite) in order.into_iter().zip(elites) {
        population[slot] = elite;
    }
}
