//! GA-based job-to-worker placement.
//!
//! Two interchangeable encodings share one set of capabilities
//! ([`Chromosome`]): evaluation, point-wise reassignment and extraction.
//!
//! # Encoding
//!
//! - **Flat**: one `(job, worker)` gene per job.
//! - **Grouped**: one `(worker, jobs)` gene per worker.
//!
//! # Variants
//!
//! - [`evolution`]: generational loop with in-place worker-swap crossover
//!   and fixed-target mutation, seeded by the deterministic rotation
//!   population.
//! - [`hierarchical`]: two-level elitist resampling over sets of shuffled
//!   grouped chromosomes.
//!
//! # Submodules
//!
//! - [`init`]: population builders
//! - [`extract`]: chromosome → job/worker lists with conservation checks

mod chromosome;
mod context;
pub mod evolution;
pub mod extract;
pub mod fitness;
pub mod hierarchical;
pub mod init;

pub use chromosome::{
    Chromosome, FlatChromosome, FlatGene, GroupedChromosome, GroupedGene, Individual,
};
pub use context::{RunContext, Snapshot};
pub use evolution::{EvolutionResult, GenerationStats, evolve};
pub use extract::{Extraction, extract};
pub use hierarchical::{HierarchicalResult, evolve_hierarchical};
