use crate::clock::Clock;
use crate::config::PollConfig;
use crate::error::RetrainResult;
use crate::job::{FinishedJob, RetrainService};
use crate::poller::JobPoller;
use crate::storage::StorageReference;
use crate::submitter::JobSubmitter;
use std::sync::Arc;

/// Submits a retrain job and follows it to completion.
#[derive(Clone)]
pub struct Retrainer {
    submitter: JobSubmitter,
    poller: JobPoller,
}

impl Retrainer {
    pub fn new(service: RetrainService, config: PollConfig) -> Self {
        Self { submitter: JobSubmitter::new(service.clone()), poller: JobPoller::new(service, config) }
    }

    pub fn with_clock(service: RetrainService, config: PollConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            submitter: JobSubmitter::new(service.clone()),
            poller: JobPoller::with_clock(service, config, clock),
        }
    }

    pub fn submitter(&self) -> &JobSubmitter {
        &self.submitter
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    /// Retrains on `input`, writing the model to `output`; returns the `.ilearner` artifacts.
    pub async fn retrain(&self, input: &StorageReference, output: &StorageReference) -> RetrainResult<FinishedJob> {
        let handle = self.submitter.submit(input, output).await?;
        self.poller.poll(&handle).await
    }
}
