//! Genetic-algorithm job placement.
//!
//! Places a batch of independent jobs onto a pool of heterogeneous workers
//! so that the total execution cost (Σ length / speed) is minimised.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Worker`, `Assignment`, `JobOutcome`
//! - **`ga`**: Chromosome encodings, population builders, the flat and
//!   hierarchical evolution loops and assignment extraction
//! - **`scheduler`**: `PlacementPolicy` with `GaScheduler` and a
//!   round-robin baseline, plus `AssignmentKpi`
//! - **`broker`**: Event-driven adapter around a placement policy
//! - **`config`**: Serde-deserializable `GaConfig`
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown bindings)
//!
//! # Example
//!
//! ```
//! use ga_placement::prelude::*;
//!
//! let mut jobs: Vec<Job> = (0..8)
//!     .map(|i| Job::new(i, 1000.0 + 250.0 * i as f64).unwrap())
//!     .collect();
//! let workers = vec![
//!     Worker::new(0, 250.0).unwrap(),
//!     Worker::new(1, 1000.0).unwrap(),
//! ];
//!
//! let scheduler = GaScheduler::new(GaConfig::default().with_seed(7));
//! let assignment = scheduler.schedule(&mut jobs, &workers).unwrap();
//! let kpi = AssignmentKpi::calculate(&assignment, &jobs, &workers);
//! assert!(kpi.total_cost > 0.0);
//! ```
//!
//! # Logging
//!
//! The crate emits `tracing` events and installs no subscriber.

pub mod broker;
pub mod config;
pub mod error;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, SchedulerError};

/// Common imports.
pub mod prelude {
    pub use crate::broker::{Broker, BrokerAction, CompletionState};
    pub use crate::config::{GaConfig, HierarchicalConfig, Representation};
    pub use crate::error::{Result, SchedulerError};
    pub use crate::models::{Assignment, Job, JobOutcome, JobStatus, Worker};
    pub use crate::scheduler::{AssignmentKpi, GaScheduler, PlacementPolicy, RoundRobinScheduler};
}
