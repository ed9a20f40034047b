//! GA placement policy.
//!
//! # Algorithm
//!
//! 1. Reject empty batches and duplicate IDs.
//! 2. Dispatch pre-bound jobs verbatim; postpone those whose worker is
//!    missing from the batch.
//! 3. Run the configured GA variant over the unbound jobs:
//!    - `Flat`: rotation population + generational loop.
//!    - `Grouped`: shuffled chromosome-sets + two-level loop.
//! 4. Extract the fittest chromosome and tag every dispatched job with its
//!    final worker.
//!
//! The run works on its own sorted copies of the batch; the caller's jobs
//! are only touched in step 4.

use std::collections::HashSet;

use tracing::{info, warn};

use super::PlacementPolicy;
use crate::config::{GaConfig, Representation};
use crate::error::{Result, SchedulerError};
use crate::ga::init::{chromosome_sets, rotation_population};
use crate::ga::{Extraction, RunContext, evolve, evolve_hierarchical, extract};
use crate::models::{Assignment, Job, Worker, WorkerId};
use crate::validation::validate_input;

/// Result of one GA run over unbound jobs.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Job/worker lists of the fittest chromosome.
    pub extraction: Extraction,
    /// Its fitness.
    pub fitness: f64,
    /// Generations executed (outer + inner for the grouped variant).
    pub generations: usize,
}

/// Genetic-algorithm placement policy.
///
/// # Example
///
/// ```
/// use ga_placement::config::GaConfig;
/// use ga_placement::models::{Job, Worker};
/// use ga_placement::scheduler::{GaScheduler, PlacementPolicy};
///
/// let mut jobs = vec![Job::new(0, 1000.0).unwrap(), Job::new(1, 2000.0).unwrap()];
/// let workers = vec![Worker::new(0, 500.0).unwrap(), Worker::new(1, 1000.0).unwrap()];
///
/// let scheduler = GaScheduler::new(GaConfig::default().with_seed(42));
/// let assignment = scheduler.schedule(&mut jobs, &workers).unwrap();
/// assert_eq!(assignment.dispatch_count(), 2);
/// assert!(jobs.iter().all(|j| j.assigned_worker.is_some()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GaScheduler {
    config: GaConfig,
}

impl GaScheduler {
    /// Creates a scheduler.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the configured GA variant over `jobs`, ignoring any bindings.
    pub fn place(&self, jobs: &[Job], workers: &[Worker]) -> Result<Placement> {
        self.config.validate()?;
        let mut ctx = RunContext::new(jobs, workers, self.config.seed)?;

        let idle = ctx.snapshot.idle_workers();
        if !idle.is_empty() {
            warn!(
                idle = idle.len(),
                active = ctx.snapshot.active_worker_count(),
                "more workers than jobs"
            );
        }

        info!(
            representation = ?self.config.representation,
            jobs = ctx.snapshot.job_count(),
            workers = ctx.snapshot.worker_count(),
            seed = ?self.config.seed,
            "starting GA placement"
        );

        match self.config.representation {
            Representation::Flat => {
                let population = rotation_population(&ctx.snapshot)?;
                let result = evolve(population, &ctx.snapshot, &self.config, &mut ctx.rng)?;
                Ok(Placement {
                    extraction: extract(&result.best, &ctx.snapshot)?,
                    fitness: result.best_fitness,
                    generations: result.generations,
                })
            }
            Representation::Grouped => {
                let h = &self.config.hierarchical;
                let sets =
                    chromosome_sets(&ctx.snapshot, h.set_count, h.chromosomes_per_set, &mut ctx.rng)?;
                let result =
                    evolve_hierarchical(sets, &ctx.snapshot, h, self.config.parallel, &mut ctx.rng)?;
                Ok(Placement {
                    extraction: extract(&result.best, &ctx.snapshot)?,
                    fitness: result.best_fitness,
                    generations: result.outer_generations + result.inner_generations,
                })
            }
        }
    }
}

impl PlacementPolicy for GaScheduler {
    fn schedule(&self, jobs: &mut [Job], workers: &[Worker]) -> Result<Assignment> {
        if jobs.is_empty() || workers.is_empty() {
            return Err(SchedulerError::EmptyInput {
                jobs: jobs.len(),
                workers: workers.len(),
            });
        }
        if let Err(findings) = validate_input(jobs, workers) {
            let fatal: Vec<_> = findings.iter().filter(|f| f.is_fatal()).cloned().collect();
            if !fatal.is_empty() {
                return Err(SchedulerError::Validation(fatal));
            }
        }

        let worker_ids: HashSet<WorkerId> = workers.iter().map(|w| w.id).collect();
        let mut assignment = Assignment::new();
        let mut unbound = Vec::new();

        for job in jobs.iter() {
            match job.assigned_worker {
                None => unbound.push(job.clone()),
                Some(worker_id) if worker_ids.contains(&worker_id) => {
                    assignment.add_dispatch(job.id, worker_id);
                }
                Some(worker_id) => {
                    let err = SchedulerError::UnresolvedBinding {
                        job_id: job.id,
                        worker_id,
                    };
                    warn!(%err, "postponing job");
                    assignment.add_postponed(job.id, worker_id);
                }
            }
        }

        if !unbound.is_empty() {
            let placement = self.place(&unbound, workers)?;
            for (job, worker) in placement.extraction.pairs() {
                assignment.add_dispatch(job.id, worker.id);
            }
            assignment.fitness = Some(placement.fitness);
            assignment.representation = Some(self.config.representation);
        }

        assignment.tag_jobs(jobs);
        info!(
            dispatched = assignment.dispatch_count(),
            postponed = assignment.postponed.len(),
            fitness = ?assignment.fitness,
            "placement complete"
        );
        Ok(assignment)
    }
}
