//! Input validation for placement batches.
//!
//! Checks structural integrity of jobs and workers before a run.
//! Detects:
//! - Duplicate job IDs
//! - Duplicate worker IDs
//! - Pre-bindings that reference a worker missing from the batch
//!
//! Duplicate IDs make the job/worker mapping ambiguous and are fatal.
//! Unknown bindings are not: the broker postpones those jobs until the
//! worker shows up.

use crate::models::{Job, Worker};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Finding category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two jobs or two workers share the same ID.
    DuplicateId,
    /// A job is bound to a worker that is not in the batch.
    UnknownWorkerBinding,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether this finding blocks the run.
    pub fn is_fatal(&self) -> bool {
        self.kind == ValidationErrorKind::DuplicateId
    }
}

/// Validates a job/worker batch.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_input(jobs: &[Job], workers: &[Worker]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut worker_ids = HashSet::new();
    for w in workers {
        if !worker_ids.insert(w.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", w.id),
            ));
        }
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if let Some(worker_id) = job.assigned_worker {
            if !worker_ids.contains(&worker_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownWorkerBinding,
                    format!("Job {} is bound to unknown worker {worker_id}", job.id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workers() -> Vec<Worker> {
        vec![Worker::new(0, 500.0).unwrap(), Worker::new(1, 750.0).unwrap()]
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new(0, 1000.0).unwrap(),
            Job::new(1, 1200.0).unwrap().bound_to(1),
            Job::new(2, 900.0).unwrap(),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_jobs(), &sample_workers()).is_ok());
    }

    #[test]
    fn test_duplicate_job_id() {
        let jobs = vec![Job::new(3, 10.0).unwrap(), Job::new(3, 20.0).unwrap()];
        let errors = validate_input(&jobs, &sample_workers()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("job")));
        assert!(errors.iter().all(|e| e.is_fatal()));
    }

    #[test]
    fn test_duplicate_worker_id() {
        let workers = vec![Worker::new(0, 1.0).unwrap(), Worker::new(0, 2.0).unwrap()];
        let errors = validate_input(&sample_jobs()[..1], &workers).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("worker")));
    }

    #[test]
    fn test_unknown_binding_not_fatal() {
        let jobs = vec![Job::new(0, 10.0).unwrap().bound_to(42)];
        let errors = validate_input(&jobs, &sample_workers()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownWorkerBinding);
        assert!(!errors[0].is_fatal());
    }

    #[test]
    fn test_multiple_errors() {
        let jobs = vec![
            Job::new(0, 10.0).unwrap().bound_to(9),
            Job::new(0, 10.0).unwrap(),
        ];
        let errors = validate_input(&jobs, &[]).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
