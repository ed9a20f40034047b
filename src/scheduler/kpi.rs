//! Assignment quality metrics (KPIs).
//!
//! Computes load indicators from a placement and its input batch, assuming
//! each worker runs its jobs back to back.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Busy time | Sum of length/speed over a worker's jobs |
//! | Makespan | Largest busy time |
//! | Total cost | Sum of busy times (the GA fitness) |
//! | Avg Utilization | Mean of busy/makespan over workers that received work |
//! | Load imbalance | makespan / mean busy time |

use std::collections::HashMap;

use crate::models::{Assignment, Job, JobId, Worker, WorkerId};

/// Placement performance indicators.
#[derive(Debug, Clone)]
pub struct AssignmentKpi {
    /// Latest finishing worker's busy time.
    pub makespan: f64,
    /// Sum of execution times across all dispatched jobs.
    pub total_cost: f64,
    /// Average worker utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Ratio of makespan to mean busy time. 1.0 is perfectly balanced.
    pub load_imbalance: f64,
    /// Per-worker busy time.
    pub busy_time_by_worker: HashMap<WorkerId, f64>,
    /// Per-worker dispatched job count.
    pub jobs_by_worker: HashMap<WorkerId, usize>,
}

impl AssignmentKpi {
    /// Computes KPIs from an assignment and its input batch.
    ///
    /// Dispatches naming a job or worker absent from the batch are skipped.
    /// Workers without dispatches count as idle (busy time 0).
    pub fn calculate(assignment: &Assignment, jobs: &[Job], workers: &[Worker]) -> Self {
        let lengths: HashMap<JobId, f64> = jobs.iter().map(|j| (j.id, j.length())).collect();
        let speeds: HashMap<WorkerId, &Worker> = workers.iter().map(|w| (w.id, w)).collect();

        let mut busy_time_by_worker: HashMap<WorkerId, f64> =
            workers.iter().map(|w| (w.id, 0.0)).collect();
        let mut jobs_by_worker: HashMap<WorkerId, usize> = HashMap::new();

        for d in &assignment.dispatches {
            let (Some(&length), Some(worker)) = (lengths.get(&d.job_id), speeds.get(&d.worker_id))
            else {
                continue;
            };
            *busy_time_by_worker.entry(d.worker_id).or_insert(0.0) += worker.execution_time(length);
            *jobs_by_worker.entry(d.worker_id).or_insert(0) += 1;
        }

        let makespan = busy_time_by_worker.values().copied().fold(0.0, f64::max);
        let total_cost: f64 = busy_time_by_worker.values().sum();
        let n = busy_time_by_worker.len();

        let avg_utilization = if makespan <= 0.0 || jobs_by_worker.is_empty() {
            0.0
        } else {
            jobs_by_worker
                .keys()
                .map(|w| busy_time_by_worker[w] / makespan)
                .sum::<f64>()
                / jobs_by_worker.len() as f64
        };

        let load_imbalance = if total_cost <= 0.0 {
            1.0
        } else {
            makespan / (total_cost / n as f64)
        };

        Self {
            makespan,
            total_cost,
            avg_utilization,
            load_imbalance,
            busy_time_by_worker,
            jobs_by_worker,
        }
    }

    /// Whether the placement meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: f64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}
