//! Flat and grouped chromosome encodings.
//!
//! # Encoding
//!
//! - **Flat**: one gene per job. Gene `k` is a `(job, worker)` pair; the job
//!   is fixed at construction, only the worker changes.
//! - **Grouped**: one gene per worker. Each gene holds the ordered jobs that
//!   worker executes. A job appears in at most one gene.
//!
//! Both encodings address jobs and workers by index into the run's
//! [`Snapshot`] and expose the same point-wise operation: move one job slot
//! to another worker. A *slot* is a gene position for flat chromosomes and
//! a snapshot job index for grouped ones.

use super::Snapshot;
use super::fitness::{flat_cost, grouped_cost};

/// An individual with a cached fitness (lower = better).
pub trait Individual: Clone + Send + Sync {
    /// Cached fitness. `f64::INFINITY` until evaluated.
    fn fitness(&self) -> f64;

    /// Stores a fitness value.
    fn set_fitness(&mut self, fitness: f64);
}

/// Capabilities every chromosome encoding provides to the evolution loops.
pub trait Chromosome: Individual {
    /// Computes the cost of this assignment. Pure.
    fn evaluate(&self, snapshot: &Snapshot) -> f64;

    /// Number of reassignable job slots.
    fn slot_count(&self) -> usize;

    /// Worker index bound to a slot.
    fn worker_at(&self, slot: usize) -> Option<usize>;

    /// Binds a slot to another worker and invalidates the cached fitness.
    fn reassign(&mut self, slot: usize, worker: usize);

    /// `(job, worker)` index pairs in extraction order.
    fn placements(&self) -> Vec<(usize, usize)>;
}

/// Flat gene: a job bound to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatGene {
    job: usize,
    /// Worker index into the snapshot.
    pub worker: usize,
}

impl FlatGene {
    /// Binds `job` to `worker`.
    pub fn new(job: usize, worker: usize) -> Self {
        Self { job, worker }
    }

    /// Job index into the snapshot.
    #[inline]
    pub fn job(&self) -> usize {
        self.job
    }
}

/// One gene per job.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatChromosome {
    /// Genes in job-slot order.
    pub genes: Vec<FlatGene>,
    /// Fitness value (lower = better).
    pub fitness: f64,
}

impl FlatChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(genes: Vec<FlatGene>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Worker indices in gene order.
    pub fn worker_sequence(&self) -> Vec<usize> {
        self.genes.iter().map(|g| g.worker).collect()
    }
}

impl Individual for FlatChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl Chromosome for FlatChromosome {
    fn evaluate(&self, snapshot: &Snapshot) -> f64 {
        flat_cost(&self.genes, snapshot)
    }

    fn slot_count(&self) -> usize {
        self.genes.len()
    }

    fn worker_at(&self, slot: usize) -> Option<usize> {
        self.genes.get(slot).map(|g| g.worker)
    }

    fn reassign(&mut self, slot: usize, worker: usize) {
        if let Some(gene) = self.genes.get_mut(slot) {
            gene.worker = worker;
            self.fitness = f64::INFINITY;
        }
    }

    fn placements(&self) -> Vec<(usize, usize)> {
        self.genes.iter().map(|g| (g.job, g.worker)).collect()
    }
}

/// Grouped gene: a worker and the ordered jobs it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedGene {
    /// Worker index into the snapshot.
    pub worker: usize,
    /// Job indices in execution order.
    pub jobs: Vec<usize>,
}

impl GroupedGene {
    /// Creates a gene.
    pub fn new(worker: usize, jobs: Vec<usize>) -> Self {
        Self { worker, jobs }
    }
}

/// One gene per worker.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedChromosome {
    /// Genes, one per worker.
    pub genes: Vec<GroupedGene>,
    /// Fitness value (lower = better).
    pub fitness: f64,
}

impl GroupedChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(genes: Vec<GroupedGene>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Total number of job entries across genes.
    pub fn job_count(&self) -> usize {
        self.genes.iter().map(|g| g.jobs.len()).sum()
    }

    /// `(gene, position)` holding a job index.
    pub fn locate(&self, job: usize) -> Option<(usize, usize)> {
        self.genes.iter().enumerate().find_map(|(gi, gene)| {
            gene.jobs.iter().position(|&j| j == job).map(|pos| (gi, pos))
        })
    }

    /// Whether every job index in `0..job_count` appears exactly once.
    pub fn is_valid(&self, job_count: usize) -> bool {
        let mut seen = vec![false; job_count];
        for gene in &self.genes {
            for &job in &gene.jobs {
                match seen.get_mut(job) {
                    Some(flag) if !*flag => *flag = true,
                    _ => return false,
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

impl Individual for GroupedChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl Chromosome for GroupedChromosome {
    fn evaluate(&self, snapshot: &Snapshot) -> f64 {
        grouped_cost(&self.genes, snapshot)
    }

    fn slot_count(&self) -> usize {
        self.job_count()
    }

    fn worker_at(&self, slot: usize) -> Option<usize> {
        self.locate(slot).map(|(gi, _)| self.genes[gi].worker)
    }

    /// Moves the job out of its current group and appends it to the group
    /// of `worker`, creating that group if the worker had none.
    fn reassign(&mut self, slot: usize, worker: usize) {
        let Some((gi, pos)) = self.locate(slot) else {
            return;
        };
        if self.genes[gi].worker == worker {
            return;
        }
        let job = self.genes[gi].jobs.remove(pos);
        match self.genes.iter_mut().find(|g| g.worker == worker) {
            Some(target) => target.jobs.push(job),
            None => self.genes.push(GroupedGene::new(worker, vec![job])),
        }
        self.fitness = f64::INFINITY;
    }

    fn placements(&self) -> Vec<(usize, usize)> {
        self.genes
            .iter()
            .flat_map(|g| g.jobs.iter().map(move |&job| (job, g.worker)))
            .collect()
    }
}

impl From<&FlatChromosome> for GroupedChromosome {
    /// Groups flat genes by worker, in order of first appearance.
    fn from(flat: &FlatChromosome) -> Self {
        let mut genes: Vec<GroupedGene> = Vec::new();
        for gene in &flat.genes {
            match genes.iter_mut().find(|g| g.worker == gene.worker) {
                Some(group) => group.jobs.push(gene.job),
                None => genes.push(GroupedGene::new(gene.worker, vec![gene.job])),
            }
        }
        Self::new(genes)
    }
}
