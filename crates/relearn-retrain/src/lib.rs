//! Relearn Retrain
//!
//! Client-side orchestration of a remote retrain-and-update cycle:
//! - Submitting and starting retrain jobs (`JobSubmitter`)
//! - Polling job status with a time budget (`JobPoller`)
//! - Picking trained model blobs out of finished jobs (`select_artifacts`)
//! - Pushing those blobs to a predictive endpoint (`EndpointUpdater`)
//! - Scoring against the predictive service (`ScoringClient`)

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod job;
pub mod pipeline;
pub mod poller;
pub mod request;
pub mod retrainer;
pub mod scoring;
pub mod status;
pub mod storage;
pub mod submitter;
pub mod updater;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::{ConfigError, ConfigResult, PollConfig, RelearnConfig};
pub use error::{RequestStage, RetrainError, RetrainResult};
pub use filter::{is_model_artifact, select_artifacts, ARTIFACT_EXTENSION};
pub use job::{FinishedJob, JobHandle, RetrainService, API_VERSION};
pub use pipeline::{PipelineReport, RetrainPipeline};
pub use poller::{JobPoller, PollStep};
pub use request::{RetrainRequest, INPUT_SLOT, OUTPUT_SLOT};
pub use retrainer::Retrainer;
pub use scoring::{ScoreRequest, ScoreResponse, ScoringClient, StringTable};
pub use status::{JobStatus, JobStatusCode};
pub use storage::{StorageAccount, StorageReference};
pub use submitter::JobSubmitter;
pub use updater::{EndpointUpdater, UpdateOutcome};
