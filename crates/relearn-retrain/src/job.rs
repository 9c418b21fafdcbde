use crate::storage::StorageReference;
use relearn_abstraction::Transport;
use std::fmt;
use std::sync::Arc;

/// API version appended to every jobs-collection URL.
pub const API_VERSION: &str = "2.0";

/// Connection to the retraining service's jobs collection.
#[derive(Clone)]
pub struct RetrainService {
    jobs_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl RetrainService {
    /// `jobs_url` is the jobs collection, e.g. `https://…/services/{id}/jobs`.
    pub fn new(jobs_url: impl Into<String>, api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let jobs_url = jobs_url.into().trim_end_matches('/').to_string();
        Self { jobs_url, api_key: api_key.into(), transport }
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn submit_url(&self) -> String {
        format!("{}?api-version={}", self.jobs_url, API_VERSION)
    }

    pub(crate) fn start_url(&self, job_id: &str) -> String {
        format!("{}/{}/start?api-version={}", self.jobs_url, job_id, API_VERSION)
    }
}

impl fmt::Debug for RetrainService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrainService").field("jobs_url", &self.jobs_url).finish_non_exhaustive()
    }
}

/// A submitted job: identifier plus the status URL derived from it.
///
/// The status URL is computed once here and is the only address used for
/// polling and for the timeout cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    job_id: String,
    status_url: String,
}

impl JobHandle {
    pub fn new(jobs_url: &str, job_id: impl Into<String>) -> Self {
        let job_id = job_id.into();
        let status_url = format!("{}/{}?api-version={}", jobs_url.trim_end_matches('/'), job_id, API_VERSION);
        Self { job_id, status_url }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }
}

/// A job the service reported as finished, with its model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedJob {
    pub job_id: String,
    pub artifacts: Vec<StorageReference>,
}

impl FinishedJob {
    pub fn message(&self) -> String {
        format!("Job {} finished!", self.job_id)
    }
}
