use crate::config::RelearnConfig;
use crate::error::RetrainResult;
use crate::job::RetrainService;
use crate::retrainer::Retrainer;
use crate::storage::StorageReference;
use crate::updater::{EndpointUpdater, UpdateOutcome};
use relearn_abstraction::Transport;
use std::sync::Arc;
use tracing::info;

/// What a completed retrain-and-update run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub job_id: String,
    /// `Job {id} finished!`
    pub retrain_message: String,
    /// One entry per artifact, in artifact order.
    pub outcomes: Vec<UpdateOutcome>,
}

impl PipelineReport {
    pub fn all_updated(&self) -> bool {
        self.outcomes.iter().all(UpdateOutcome::is_success)
    }
}

/// Retrain, then push the resulting models to the predictive endpoint.
#[derive(Clone)]
pub struct RetrainPipeline {
    retrainer: Retrainer,
    updater: EndpointUpdater,
    service_name: String,
}

impl RetrainPipeline {
    pub fn new(retrainer: Retrainer, updater: EndpointUpdater, service_name: impl Into<String>) -> Self {
        Self { retrainer, updater, service_name: service_name.into() }
    }

    /// Wires the pipeline from configuration, sharing one transport between stages.
    pub fn from_config(config: &RelearnConfig, transport: Arc<dyn Transport>) -> Self {
        let service = RetrainService::new(&config.retrain.jobs_url, &config.retrain.api_key, Arc::clone(&transport));
        let updater = EndpointUpdater::new(&config.endpoint.url, &config.endpoint.api_key, transport);
        Self::new(Retrainer::new(service, config.poll), updater, &config.endpoint.service_name)
    }

    pub fn retrainer(&self) -> &Retrainer {
        &self.retrainer
    }

    pub fn updater(&self) -> &EndpointUpdater {
        &self.updater
    }

    /// Runs both stages. A retrain failure ends the run before any update is attempted.
    pub async fn run(&self, input: &StorageReference, output: &StorageReference) -> RetrainResult<PipelineReport> {
        let job = self.retrainer.retrain(input, output).await?;
        info!(job_id = %job.job_id, artifacts = job.artifacts.len(), "Model update started");

        let outcomes = self.updater.update(&job.artifacts, &self.service_name).await?;
        Ok(PipelineReport { retrain_message: job.message(), job_id: job.job_id, outcomes })
    }
}
