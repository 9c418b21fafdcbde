//! Job status polling.
//!
//! Each iteration is one [`JobPoller::step`]: fetch the status, check the time
//! budget, then dispatch on the reported state. Only `NotStarted` and
//! `Running` lead to another iteration, after one poll interval on the clock.

use crate::clock::{Clock, TokioClock};
use crate::config::PollConfig;
use crate::error::{RequestStage, RetrainError, RetrainResult};
use crate::filter::select_artifacts;
use crate::job::{FinishedJob, JobHandle, RetrainService};
use crate::status::{JobStatus, JobStatusCode};
use relearn_abstraction::HttpRequest;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of a single poll iteration that did not end in failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// The job has not reached a terminal state yet.
    Pending(JobStatusCode),
    /// The job finished; artifacts are already filtered.
    Finished(FinishedJob),
}

/// Polls a job's status URL until it finishes, fails, is cancelled or runs out of time.
#[derive(Clone)]
pub struct JobPoller {
    service: RetrainService,
    config: PollConfig,
    clock: Arc<dyn Clock>,
}

impl JobPoller {
    pub fn new(service: RetrainService, config: PollConfig) -> Self {
        Self::with_clock(service, config, Arc::new(TokioClock::new()))
    }

    pub fn with_clock(service: RetrainService, config: PollConfig, clock: Arc<dyn Clock>) -> Self {
        Self { service, config, clock }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls until the job reaches a terminal state or the timeout passes.
    ///
    /// On timeout the job is deleted (best effort) and `RetrainError::TimedOut` is returned.
    pub async fn poll(&self, handle: &JobHandle) -> RetrainResult<FinishedJob> {
        let started = self.clock.now();
        debug!(job_id = %handle.job_id(), timeout = ?self.config.timeout(), "Polling retrain job");

        loop {
            match self.step(handle, started).await? {
                PollStep::Pending(code) => {
                    debug!(
                        job_id = %handle.job_id(),
                        status = %code,
                        elapsed = ?self.elapsed_since(started),
                        "Retrain job still in progress, waiting..."
                    );
                    self.clock.sleep(self.config.interval()).await;
                }
                PollStep::Finished(job) => return Ok(job),
            }
        }
    }

    /// Runs one iteration: GET status, check the budget measured from `started`, dispatch.
    pub async fn step(&self, handle: &JobHandle, started: Duration) -> RetrainResult<PollStep> {
        let request = HttpRequest::get(handle.status_url(), self.service.api_key());
        let response = self.service.transport().send(request).await?;
        if !response.is_success() {
            error!(job_id = %handle.job_id(), status = response.status, "Status request failed");
            return Err(RetrainError::http(RequestStage::Status, &response));
        }

        let status: JobStatus = response.json().map_err(|e| RetrainError::decode("job status", &e))?;

        let elapsed = self.elapsed_since(started);
        if elapsed > self.config.timeout() {
            warn!(job_id = %handle.job_id(), elapsed = ?elapsed, "Retrain job timed out, deleting");
            self.cancel(handle).await;
            return Err(RetrainError::TimedOut { job_id: handle.job_id().to_string(), elapsed });
        }

        match status.status_code {
            code @ (JobStatusCode::NotStarted | JobStatusCode::Running) => Ok(PollStep::Pending(code)),
            JobStatusCode::Failed => {
                error!(job_id = %handle.job_id(), "Retrain job failed");
                Err(RetrainError::JobFailed {
                    job_id: handle.job_id().to_string(),
                    details: status.details.unwrap_or_default(),
                })
            }
            JobStatusCode::Cancelled => {
                warn!(job_id = %handle.job_id(), "Retrain job cancelled");
                Err(RetrainError::JobCancelled { job_id: handle.job_id().to_string() })
            }
            JobStatusCode::Finished => {
                let artifacts = select_artifacts(&status);
                info!(job_id = %handle.job_id(), artifacts = artifacts.len(), "Retrain job finished");
                Ok(PollStep::Finished(FinishedJob { job_id: handle.job_id().to_string(), artifacts }))
            }
        }
    }

    fn elapsed_since(&self, started: Duration) -> Duration {
        self.clock.now().saturating_sub(started)
    }

    // The timeout is reported whatever happens here.
    async fn cancel(&self, handle: &JobHandle) {
        let request = HttpRequest::delete(handle.status_url(), self.service.api_key());
        match self.service.transport().send(request).await {
            Ok(response) if response.is_success() => {
                info!(job_id = %handle.job_id(), "Timed out retrain job deleted");
            }
            Ok(response) => {
                warn!(job_id = %handle.job_id(), status = response.status, "Failed to delete timed out job");
            }
            Err(e) => {
                warn!(job_id = %handle.job_id(), error = %e, "Failed to delete timed out job");
            }
        }
    }
}
