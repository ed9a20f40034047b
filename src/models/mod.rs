//! Placement domain models.
//!
//! Provides the data types exchanged with the broker: the jobs to place,
//! the workers they run on, and the resulting assignment.
//!
//! # Domain Mappings
//!
//! | ga-placement | Cloud simulation | Batch cluster |
//! |--------------|------------------|---------------|
//! | Job | Cloudlet | Batch job |
//! | Worker | VM | Node slot |
//! | Assignment | Cloudlet→VM binding | Job→node plan |

mod assignment;
mod job;
mod worker;

pub use assignment::{Assignment, Dispatch, JobOutcome, JobStatus, Postponed};
pub use job::{Job, JobId};
pub use worker::{Worker, WorkerId};
