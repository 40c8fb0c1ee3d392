//! In-memory job table shared by the local backends.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;
use uuid::Uuid;

use qharness_hal::{ExecutionResult, HalError, HalResult, Job, JobId, JobStatus};

/// Job data for a local backend.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Jobs keyed by id.
#[derive(Default)]
pub(crate) struct JobTable {
    jobs: Mutex<FxHashMap<String, SimJob>>,
}

impl JobTable {
    /// Create a queued job and return its id.
    pub(crate) fn create(&self, backend: &str, shots: u32, max_credits: u32) -> JobId {
        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::queued(job_id.clone(), backend, shots, max_credits);

        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        job_id
    }

    /// Store the outcome of a job and move it to its terminal state.
    pub(crate) fn finish(&self, job_id: &JobId, outcome: HalResult<ExecutionResult>) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            match outcome {
                Ok(result) => {
                    if sim_job.job.finish(JobStatus::Completed) {
                        sim_job.result = Some(result);
                    }
                }
                Err(e) => {
                    sim_job.job.finish(JobStatus::Failed(e.to_string()));
                }
            }
        }
    }

    pub(crate) fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    pub(crate) fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::Backend(format!(
                "job {job_id} has no result (status: {status})"
            ))),
        }
    }

    pub(crate) fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job.finish(JobStatus::Cancelled);
        Ok(())
    }
}
