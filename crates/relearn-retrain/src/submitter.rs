use crate::error::{RequestStage, RetrainError, RetrainResult};
use crate::job::{JobHandle, RetrainService};
use crate::request::RetrainRequest;
use crate::storage::StorageReference;
use relearn_abstraction::HttpRequest;
use tracing::{debug, error, info, warn};

/// Creates and starts retrain jobs.
#[derive(Debug, Clone)]
pub struct JobSubmitter {
    service: RetrainService,
}

impl JobSubmitter {
    pub fn new(service: RetrainService) -> Self {
        Self { service }
    }

    /// Creates a job reading `input` and writing `output`, then starts it.
    ///
    /// If the job is created but the start call fails, the created job is left
    /// on the service.
    pub async fn submit(&self, input: &StorageReference, output: &StorageReference) -> RetrainResult<JobHandle> {
        let request = RetrainRequest::new(input.clone(), output.clone());
        debug!(
            jobs_url = %self.service.jobs_url(),
            input = %input.relative_location(),
            output = %output.relative_location(),
            "Submitting retrain job"
        );

        let http = HttpRequest::post(self.service.submit_url(), self.service.api_key()).with_json(&request)?;
        let response = self.service.transport().send(http).await?;
        if !response.is_success() {
            error!(status = response.status, "Retrain job submission rejected");
            return Err(RetrainError::http(RequestStage::Submit, &response));
        }

        let job_id: String = response.json().map_err(|e| RetrainError::decode("job id", &e))?;
        let handle = JobHandle::new(self.service.jobs_url(), job_id);
        info!(job_id = %handle.job_id(), "Retrain job created");

        let start = HttpRequest::post(self.service.start_url(handle.job_id()), self.service.api_key());
        let response = self.service.transport().send(start).await?;
        if !response.is_success() {
            warn!(
                job_id = %handle.job_id(),
                status = response.status,
                "Retrain job created but not started; it remains on the service"
            );
            return Err(RetrainError::http(RequestStage::Start, &response));
        }

        info!(job_id = %handle.job_id(), "Retrain job started");
        Ok(handle)
    }
}
