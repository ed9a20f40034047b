//! Broker adapter.
//!
//! Drives a [`PlacementPolicy`] from the events an execution substrate
//! emits: job and worker submission, worker-creation acknowledgements and
//! job completions.
//!
//! # Lifecycle
//!
//! 1. Jobs and workers are submitted. Jobs may be bound to a worker.
//! 2. Each requested worker is acknowledged as created or failed.
//! 3. Once every pending acknowledgement has arrived, the policy runs over
//!    the waiting jobs and the workers that were actually created.
//! 4. Dispatched jobs leave the waiting list. Postponed jobs stay there
//!    until another round of workers is submitted. Jobs submitted while
//!    the pool is up are placed immediately.
//! 5. Completions are recorded in arrival order. When the last dispatched
//!    job returns the broker reports either `Finished` or `AwaitingWorkers`.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::error::{Result, SchedulerError};
use crate::models::{Assignment, Job, JobId, JobOutcome, JobStatus, Worker, WorkerId};
use crate::scheduler::{GaScheduler, PlacementPolicy};

/// What the substrate should do after a submission or acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerAction {
    /// Nothing to dispatch yet.
    Wait,
    /// Submit these jobs.
    Dispatch(Assignment),
    /// No worker could be created; nothing can run.
    Abort,
}

/// Broker state after a job completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// Dispatched jobs are still running.
    Wait,
    /// Every submitted job has returned.
    Finished,
    /// Every dispatched job has returned, but postponed jobs remain.
    AwaitingWorkers,
}

/// Event-driven wrapper around a placement policy.
#[derive(Debug)]
pub struct Broker<P = GaScheduler> {
    policy: P,
    waiting: Vec<Job>,
    in_flight: HashSet<JobId>,
    pending_acks: HashSet<WorkerId>,
    requested: Vec<Worker>,
    created: Vec<Worker>,
    completed: Vec<JobOutcome>,
}

impl<P: PlacementPolicy> Broker<P> {
    /// Creates a broker around `policy`.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            waiting: Vec::new(),
            in_flight: HashSet::new(),
            pending_acks: HashSet::new(),
            requested: Vec::new(),
            created: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Queues jobs.
    ///
    /// If the worker pool is already up, the new batch is placed right away.
    /// Otherwise it waits for the pending acknowledgements.
    pub fn submit_jobs(&mut self, jobs: impl IntoIterator<Item = Job>) -> Result<BrokerAction> {
        self.waiting.extend(jobs);
        self.dispatch_waiting()
    }

    /// Requests workers. Each one must be acknowledged through
    /// [`Broker::on_worker_created`].
    ///
    /// IDs that are already pending or created are skipped.
    pub fn submit_workers(&mut self, workers: impl IntoIterator<Item = Worker>) {
        for worker in workers {
            if self.created.iter().any(|w| w.id == worker.id) || !self.pending_acks.insert(worker.id) {
                warn!(worker = worker.id, "worker already submitted, skipping");
                continue;
            }
            self.requested.push(worker);
        }
    }

    /// Places every waiting job on the created workers.
    ///
    /// Returns `Wait` while acknowledgements are pending, before any worker
    /// exists, or when nothing new could be dispatched.
    pub fn dispatch_waiting(&mut self) -> Result<BrokerAction> {
        if !self.pending_acks.is_empty() || self.created.is_empty() || self.waiting.is_empty() {
            return Ok(BrokerAction::Wait);
        }
        let assignment = self.dispatch()?;
        if assignment.dispatch_count() == 0 {
            debug!(postponed = assignment.postponed.len(), "no waiting job could be dispatched");
            return Ok(BrokerAction::Wait);
        }
        Ok(BrokerAction::Dispatch(assignment))
    }

    /// Pins a waiting job to a worker.
    pub fn bind_job_to_worker(&mut self, job_id: JobId, worker_id: WorkerId) -> Result<()> {
        let job = self
            .waiting
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or(SchedulerError::UnknownJob(job_id))?;
        job.assigned_worker = Some(worker_id);
        Ok(())
    }

    /// Records a worker-creation acknowledgement.
    ///
    /// Runs the policy once the last pending acknowledgement arrives.
    pub fn on_worker_created(&mut self, worker_id: WorkerId, success: bool) -> Result<BrokerAction> {
        if !self.pending_acks.remove(&worker_id) {
            warn!(worker = worker_id, "acknowledgement for a worker that was not pending");
            return Ok(BrokerAction::Wait);
        }

        if success {
            if let Some(pos) = self.requested.iter().position(|w| w.id == worker_id) {
                let worker = self.requested.swap_remove(pos);
                debug!(worker = worker_id, speed = worker.speed(), "worker created");
                self.created.push(worker);
            }
        } else {
            warn!(worker = worker_id, "worker creation failed");
            self.requested.retain(|w| w.id != worker_id);
        }

        if !self.pending_acks.is_empty() {
            return Ok(BrokerAction::Wait);
        }

        if self.created.is_empty() {
            error!(jobs = self.waiting.len(), "no worker could be created, aborting");
            return Ok(BrokerAction::Abort);
        }

        self.dispatch_waiting()
    }

    /// Records a job completion.
    pub fn on_job_completed(&mut self, outcome: JobOutcome) -> CompletionState {
        if !self.in_flight.remove(&outcome.job_id) {
            warn!(job = outcome.job_id, "completion for a job that was not dispatched");
        }
        if outcome.status == JobStatus::Failed {
            warn!(job = outcome.job_id, worker = outcome.worker_id, "job failed");
        }
        self.completed.push(outcome);

        if !self.in_flight.is_empty() {
            CompletionState::Wait
        } else if self.waiting.is_empty() {
            info!(completed = self.completed.len(), "all jobs returned");
            CompletionState::Finished
        } else {
            info!(postponed = self.waiting.len(), "dispatched jobs returned, waiting for workers");
            CompletionState::AwaitingWorkers
        }
    }

    /// Jobs not yet dispatched.
    pub fn waiting_jobs(&self) -> &[Job] {
        &self.waiting
    }

    /// Workers acknowledged as created.
    pub fn created_workers(&self) -> &[Worker] {
        &self.created
    }

    /// Completion records in arrival order.
    pub fn completed(&self) -> &[JobOutcome] {
        &self.completed
    }

    /// Number of dispatched jobs still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn dispatch(&mut self) -> Result<Assignment> {
        info!(
            jobs = self.waiting.len(),
            workers = self.created.len(),
            "placing waiting jobs"
        );
        let assignment = self.policy.schedule(&mut self.waiting, &self.created)?;

        let dispatched: HashSet<JobId> = assignment.dispatches.iter().map(|d| d.job_id).collect();
        self.waiting.retain(|j| !dispatched.contains(&j.id));
        self.in_flight.extend(dispatched);
        Ok(assignment)
    }
}

impl Default for Broker<GaScheduler> {
    fn default() -> Self {
        Self::new(GaScheduler::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaConfig;
    use crate::scheduler::RoundRobinScheduler;

    fn jobs(n: u32) -> Vec<Job> {
        (0..n).map(|i| Job::new(i, 100.0 * (i + 1) as f64).unwrap()).collect()
    }

    fn outcome(job_id: JobId, worker_id: WorkerId) -> JobOutcome {
        JobOutcome {
            job_id,
            worker_id,
            status: JobStatus::Success,
            start_time: 0.0,
            finish_time: 1.0,
        }
    }

    fn ga_broker() -> Broker {
        Broker::new(GaScheduler::new(GaConfig::default().with_seed(9)))
    }

    #[test]
    fn test_waits_for_all_acks() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(3)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap(), Worker::new(1, 20.0).unwrap()]);

        assert_eq!(broker.on_worker_created(0, true).unwrap(), BrokerAction::Wait);
        let action = broker.on_worker_created(1, true).unwrap();
        let BrokerAction::Dispatch(a) = action else {
            panic!("expected dispatch, got {action:?}");
        };
        assert_eq!(a.dispatch_count(), 3);
        assert!(broker.waiting_jobs().is_empty());
        assert_eq!(broker.in_flight(), 3);
    }

    #[test]
    fn test_failed_workers_excluded() {
        let mut broker = Broker::new(RoundRobinScheduler::new());
        broker.submit_jobs(jobs(4)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap(), Worker::new(1, 20.0).unwrap()]);

        broker.on_worker_created(0, false).unwrap();
        let BrokerAction::Dispatch(a) = broker.on_worker_created(1, true).unwrap() else {
            panic!("expected dispatch");
        };
        assert!(a.dispatches.iter().all(|d| d.worker_id == 1));
        assert_eq!(broker.created_workers().len(), 1);
    }

    #[test]
    fn test_abort_when_no_worker_created() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(2)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap()]);
        assert_eq!(broker.on_worker_created(0, false).unwrap(), BrokerAction::Abort);
        assert_eq!(broker.waiting_jobs().len(), 2);
    }

    #[test]
    fn test_unexpected_ack_ignored() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(1)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap()]);
        assert_eq!(broker.on_worker_created(5, true).unwrap(), BrokerAction::Wait);
        assert!(matches!(
            broker.on_worker_created(0, true).unwrap(),
            BrokerAction::Dispatch(_)
        ));
    }

    #[test]
    fn test_bind_unknown_job() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(1)).unwrap();
        assert_eq!(
            broker.bind_job_to_worker(7, 0),
            Err(SchedulerError::UnknownJob(7))
        );
        assert!(broker.bind_job_to_worker(0, 0).is_ok());
        assert_eq!(broker.waiting_jobs()[0].assigned_worker, Some(0));
    }

    #[test]
    fn test_postponed_job_awaits_worker() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(3)).unwrap();
        broker.bind_job_to_worker(2, 9).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap()]);

        let BrokerAction::Dispatch(a) = broker.on_worker_created(0, true).unwrap() else {
            panic!("expected dispatch");
        };
        assert_eq!(a.dispatch_count(), 2);
        assert_eq!(a.postponed.len(), 1);
        assert_eq!(broker.waiting_jobs().len(), 1);

        assert_eq!(broker.on_job_completed(outcome(0, 0)), CompletionState::Wait);
        assert_eq!(
            broker.on_job_completed(outcome(1, 0)),
            CompletionState::AwaitingWorkers
        );

        // The bound worker shows up in a second round.
        broker.submit_workers(vec![Worker::new(9, 5.0).unwrap()]);
        let BrokerAction::Dispatch(a) = broker.on_worker_created(9, true).unwrap() else {
            panic!("expected dispatch");
        };
        assert_eq!(a.worker_for(2), Some(9));
        assert_eq!(broker.on_job_completed(outcome(2, 9)), CompletionState::Finished);
        assert_eq!(broker.completed().len(), 3);
    }

    #[test]
    fn test_completions_recorded_in_arrival_order() {
        let mut broker = Broker::new(RoundRobinScheduler::new());
        broker.submit_jobs(jobs(3)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 1.0).unwrap()]);
        broker.on_worker_created(0, true).unwrap();

        for id in [2, 0, 1] {
            broker.on_job_completed(outcome(id, 0));
        }
        let order: Vec<JobId> = broker.completed().iter().map(|o| o.job_id).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_late_jobs_dispatched_on_live_pool() {
        let mut broker = ga_broker();
        broker.submit_jobs(jobs(1)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 10.0).unwrap()]);
        assert!(matches!(
            broker.on_worker_created(0, true).unwrap(),
            BrokerAction::Dispatch(_)
        ));

        let late = vec![Job::new(1, 300.0).unwrap()];
        let BrokerAction::Dispatch(a) = broker.submit_jobs(late).unwrap() else {
            panic!("expected dispatch on the live worker");
        };
        assert_eq!(a.worker_for(1), Some(0));
        assert!(broker.waiting_jobs().is_empty());

        assert_eq!(broker.on_job_completed(outcome(0, 0)), CompletionState::Wait);
        assert_eq!(broker.on_job_completed(outcome(1, 0)), CompletionState::Finished);
    }

    #[test]
    fn test_jobs_after_workers_acknowledged() {
        let mut broker = Broker::new(RoundRobinScheduler::new());
        broker.submit_workers(vec![Worker::new(0, 1.0).unwrap()]);
        assert_eq!(broker.on_worker_created(0, true).unwrap(), BrokerAction::Wait);

        let BrokerAction::Dispatch(a) = broker.submit_jobs(jobs(2)).unwrap() else {
            panic!("expected dispatch");
        };
        assert_eq!(a.dispatch_count(), 2);
        assert_eq!(broker.in_flight(), 2);
    }

    #[test]
    fn test_jobs_wait_while_acks_pending() {
        let mut broker = ga_broker();
        broker.submit_workers(vec![Worker::new(0, 1.0).unwrap()]);
        assert_eq!(broker.submit_jobs(jobs(2)).unwrap(), BrokerAction::Wait);
        assert_eq!(broker.dispatch_waiting().unwrap(), BrokerAction::Wait);
        assert_eq!(broker.waiting_jobs().len(), 2);
    }

    #[test]
    fn test_postponed_only_batch_waits() {
        let mut broker = Broker::new(RoundRobinScheduler::new());
        broker.submit_workers(vec![Worker::new(0, 1.0).unwrap()]);
        broker.on_worker_created(0, true).unwrap();
        let job = Job::new(0, 1.0).unwrap().bound_to(5);
        assert_eq!(broker.submit_jobs(vec![job]).unwrap(), BrokerAction::Wait);
        assert_eq!(broker.waiting_jobs().len(), 1);
    }

    #[test]
    fn test_duplicate_worker_ids_skipped() {
        let mut broker = Broker::new(RoundRobinScheduler::new());
        broker.submit_jobs(jobs(2)).unwrap();
        broker.submit_workers(vec![Worker::new(0, 1.0).unwrap(), Worker::new(0, 2.0).unwrap()]);

        let BrokerAction::Dispatch(_) = broker.on_worker_created(0, true).unwrap() else {
            panic!("expected dispatch after the single pending ack");
        };
        assert_eq!(broker.created_workers().len(), 1);
        assert_eq!(broker.created_workers()[0].speed(), 1.0);

        // Already created: not requested again.
        broker.submit_workers(vec![Worker::new(0, 3.0).unwrap()]);
        assert_eq!(broker.on_worker_created(0, true).unwrap(), BrokerAction::Wait);
        assert_eq!(broker.created_workers().len(), 1);
    }
}
