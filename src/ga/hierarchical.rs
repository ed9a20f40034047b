//! Two-level evolution over grouped chromosomes.
//!
//! # Algorithm
//!
//! The outer level evolves chromosome-sets (each a population of grouped
//! chromosomes, costed as the sum of its members). The inner level repeats
//! the same pattern over the chromosomes of the best set. One generation of
//! either level:
//!
//! 1. Sort the population by ascending fitness (stable).
//! 2. Keep the first `elite_percent`% (at least one) unchanged.
//! 3. Append `(100 - elite_percent)`% children by mating the sorted
//!    population with itself position-wise: a draw below `mate_threshold`
//!    keeps parent A's entry, any other draw keeps parent B's. This is a
//!    copy-selection step; no genes are recombined.
//! 4. Compare the new generation's average fitness with the minimum of all
//!    averages recorded so far (the initial population's average is
//!    recorded first). A lower average marks the generation as best-so-far.
//! 5. Stop once more than `max_generations` averages are recorded or the
//!    average fell below that minimum, then record the average.
//!
//! Because elitism re-inserts the best entries, step 4 is usually satisfied
//! after the first generation.
//!
//! Chromosomes never change in this variant, so every generation is stored
//! as indices into an arena with precomputed fitness.

use rand::Rng;
use tracing::{debug, info};

use super::Snapshot;
use super::chromosome::{GroupedChromosome, Individual};
use super::fitness::evaluate_population;
use super::init::ChromosomeSet;
use crate::config::HierarchicalConfig;
use crate::error::{Result, SchedulerError};

/// Outcome of a hierarchical run.
#[derive(Debug, Clone)]
pub struct HierarchicalResult {
    /// Fittest grouped chromosome.
    pub best: GroupedChromosome,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generations executed by the outer level.
    pub outer_generations: usize,
    /// Generations executed by the inner level.
    pub inner_generations: usize,
}

/// Result of one level: the best-so-far generation as arena indices.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelOutcome {
    /// Arena indices of the best-so-far generation.
    pub best_generation: Vec<usize>,
    /// Generations executed.
    pub generations: usize,
    /// Recorded running averages, in recording order.
    pub averages: Vec<f64>,
}

/// Runs both levels over pre-built chromosome-sets.
pub fn evolve_hierarchical<R: Rng>(
    mut sets: Vec<ChromosomeSet>,
    snapshot: &Snapshot,
    config: &HierarchicalConfig,
    parallel: bool,
    rng: &mut R,
) -> Result<HierarchicalResult> {
    if sets.is_empty() || sets.iter().any(|s| s.is_empty()) {
        return Err(SchedulerError::InvalidConfig(
            "hierarchical run needs non-empty chromosome sets".into(),
        ));
    }

    for set in sets.iter_mut() {
        evaluate_population(set.as_mut_slice(), snapshot, parallel);
    }
    let set_fitness: Vec<f64> = sets.iter().map(|s| set_cost(s)).collect();

    // Outer level: chromosome-sets.
    let outer = run_level(&set_fitness, config, rng);
    let best_set = pick_fittest(&outer.best_generation, &set_fitness);
    debug!(
        generations = outer.generations,
        set = best_set,
        fitness = set_fitness[best_set],
        "outer level converged"
    );

    // Inner level: chromosomes of the winning set.
    let chromosomes = sets.swap_remove(best_set);
    let chromosome_fitness: Vec<f64> = chromosomes.iter().map(|c| c.fitness()).collect();
    let inner = run_level(&chromosome_fitness, config, rng);
    let best = pick_fittest(&inner.best_generation, &chromosome_fitness);
    let best_fitness = chromosome_fitness[best];

    info!(
        outer_generations = outer.generations,
        inner_generations = inner.generations,
        best_fitness,
        "hierarchical evolution finished"
    );

    Ok(HierarchicalResult {
        best: chromosomes[best].clone(),
        best_fitness,
        outer_generations: outer.generations,
        inner_generations: inner.generations,
    })
}

/// Rollup cost of a chromosome-set: the sum of its members' fitness.
pub fn set_cost(set: &[GroupedChromosome]) -> f64 {
    set.iter().map(|c| c.fitness()).sum()
}

/// Runs one level over an arena whose entry `i` has fitness `fitness[i]`.
pub fn run_level<R: Rng>(fitness: &[f64], config: &HierarchicalConfig, rng: &mut R) -> LevelOutcome {
    let mut population: Vec<usize> = (0..fitness.len()).collect();
    let mut averages = vec![average(&population, fitness)];
    let mut best_generation = population.clone();
    let mut generations = 0;

    loop {
        let sorted = sort_by_fitness(population, fitness);
        let elite = (sorted.len() * config.elite_percent / 100)
            .max(1)
            .min(sorted.len());
        let mut next: Vec<usize> = sorted[..elite].to_vec();
        let children = sorted.len() * 100usize.saturating_sub(config.elite_percent) / 100;
        next.extend(mate(&sorted, &sorted, children, config.mate_threshold, rng));
        generations += 1;

        let avg = average(&next, fitness);
        let floor = averages.iter().copied().fold(f64::INFINITY, f64::min);
        let improved = avg < floor;
        if improved {
            best_generation = next.clone();
        }
        let converged = averages.len() > config.max_generations || improved;
        averages.push(avg);
        population = next;

        if converged {
            break;
        }
    }

    LevelOutcome {
        best_generation,
        generations,
        averages,
    }
}

/// Position-wise copy-selection between two parent lists.
fn mate<R: Rng>(
    parent_a: &[usize],
    parent_b: &[usize],
    count: usize,
    threshold: f64,
    rng: &mut R,
) -> Vec<usize> {
    (0..count.min(parent_a.len()).min(parent_b.len()))
        .map(|x| {
            let p: f64 = rng.random();
            if p < threshold { parent_a[x] } else { parent_b[x] }
        })
        .collect()
}

fn sort_by_fitness(mut population: Vec<usize>, fitness: &[f64]) -> Vec<usize> {
    population.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    population
}

fn average(population: &[usize], fitness: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|&i| fitness[i]).sum::<f64>() / population.len() as f64
}

/// First arena index with the lowest fitness.
fn pick_fittest(generation: &[usize], fitness: &[f64]) -> usize {
    let mut best = generation[0];
    for &i in generation {
        if fitness[i] < fitness[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Chromosome;
    use crate::ga::init::chromosome_sets;
    use crate::models::{Job, Worker};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn snapshot(lengths: &[f64], speeds: &[f64]) -> Snapshot {
        let jobs: Vec<Job> = lengths
            .iter()
            .enumerate()
            .map(|(i, &l)| Job::new(i as u32, l).unwrap())
            .collect();
        let workers: Vec<Worker> = speeds
            .iter()
            .enumerate()
            .map(|(i, &s)| Worker::new(i as u32, s).unwrap())
            .collect();
        Snapshot::new(&jobs, &workers).unwrap()
    }

    fn small_config() -> HierarchicalConfig {
        HierarchicalConfig::default()
            .with_set_count(20)
            .with_chromosomes_per_set(10)
            .with_max_generations(50)
    }

    #[test]
    fn test_level_converges_on_first_improvement() {
        let fitness: Vec<f64> = (0..20).map(|i| (20 - i) as f64).collect();
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = run_level(&fitness, &HierarchicalConfig::default(), &mut rng);

        // Elitism duplicates the best entries, so the first average already drops.
        assert_eq!(outcome.generations, 1);
        assert_eq!(outcome.averages.len(), 2);
        assert!(outcome.averages[1] < outcome.averages[0]);
        assert_eq!(outcome.best_generation.len(), 2 + 18);
        assert_eq!(outcome.best_generation[0], 19);
    }

    #[test]
    fn test_level_stops_at_generation_cap() {
        let fitness = vec![4.0; 10];
        let config = HierarchicalConfig::default().with_max_generations(7);
        let mut rng = SmallRng::seed_from_u64(1);
        let outcome = run_level(&fitness, &config, &mut rng);

        // Equal fitness never lowers the average; stops once 8 averages are recorded.
        assert_eq!(outcome.generations, 8);
        assert_eq!(outcome.averages.len(), 9);
        assert_eq!(outcome.best_generation, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_level_single_entry() {
        let config = HierarchicalConfig::default().with_max_generations(3);
        let mut rng = SmallRng::seed_from_u64(1);
        let outcome = run_level(&[2.5], &config, &mut rng);
        assert_eq!(outcome.best_generation, vec![0]);
        assert_eq!(outcome.generations, 4);
    }

    #[test]
    fn test_mate_threshold_selects_parent() {
        let a = vec![1, 2, 3];
        let b = vec![7, 8, 9];
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(mate(&a, &b, 3, 1.0, &mut rng), a);
        assert_eq!(mate(&a, &b, 3, 0.0, &mut rng), b);
        assert_eq!(mate(&a, &b, 2, 0.0, &mut rng), vec![7, 8]);
    }

    #[test]
    fn test_hierarchical_returns_valid_chromosome() {
        let snap = snapshot(
            &[1000.0, 1200.0, 800.0, 1500.0, 950.0, 1100.0, 700.0, 1300.0],
            &[500.0, 750.0, 1000.0],
        );
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(42);
        let sets = chromosome_sets(&snap, config.set_count, config.chromosomes_per_set, &mut rng)
            .unwrap();

        let result = evolve_hierarchical(sets.clone(), &snap, &config, false, &mut rng).unwrap();
        assert!(result.best.is_valid(8));
        assert!((result.best.evaluate(&snap) - result.best_fitness).abs() < 1e-9);
        assert!(result.outer_generations >= 1);
        assert!(result.inner_generations >= 1);

        // Never worse than the worst chromosome of the initial pool.
        let worst = sets
            .iter()
            .flatten()
            .map(|c| c.evaluate(&snap))
            .fold(f64::MIN, f64::max);
        assert!(result.best_fitness <= worst);
    }

    #[test]
    fn test_hierarchical_single_worker() {
        let snap = snapshot(&[100.0, 200.0, 300.0], &[100.0]);
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(9);
        let sets = chromosome_sets(&snap, config.set_count, config.chromosomes_per_set, &mut rng)
            .unwrap();

        let result = evolve_hierarchical(sets, &snap, &config, true, &mut rng).unwrap();
        assert!((result.best_fitness - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let snap = snapshot(&[900.0, 400.0, 1300.0, 650.0, 1100.0], &[300.0, 800.0]);
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(17);
        let sets = chromosome_sets(&snap, config.set_count, config.chromosomes_per_set, &mut rng)
            .unwrap();

        let mut seq_rng = SmallRng::seed_from_u64(5);
        let mut par_rng = SmallRng::seed_from_u64(5);
        let seq = evolve_hierarchical(sets.clone(), &snap, &config, false, &mut seq_rng).unwrap();
        let par = evolve_hierarchical(sets, &snap, &config, true, &mut par_rng).unwrap();
        assert_eq!(seq.best, par.best);
        assert_eq!(seq.best_fitness, par.best_fitness);
        assert_eq!(seq.best.fitness(), seq.best_fitness);
    }

    #[test]
    fn test_set_cost_is_sum() {
        let mut a = GroupedChromosome::new(vec![]);
        let mut b = GroupedChromosome::new(vec![]);
        a.fitness = 1.5;
        b.fitness = 2.0;
        assert!((set_cost(&[a, b]) - 3.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_sets_rejected() {
        let snap = snapshot(&[1.0], &[1.0]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(evolve_hierarchical(vec![], &snap, &small_config(), false, &mut rng).is_err());
    }
}
