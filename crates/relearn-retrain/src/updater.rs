//! Predictive endpoint updates.
//!
//! Each trained model blob is pushed to the predictive service's update
//! endpoint with its own PATCH. A rejected PATCH is recorded for that blob and
//! the remaining blobs are still sent.

use crate::error::RetrainResult;
use crate::storage::StorageReference;
use relearn_abstraction::{format_failed_response, HttpRequest, Transport};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Result of updating the endpoint with one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { relative_location: String },
    Failed { relative_location: String, diagnostic: String },
}

impl UpdateOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    pub fn relative_location(&self) -> &str {
        match self {
            Self::Updated { relative_location } | Self::Failed { relative_location, .. } => relative_location,
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated { relative_location } => {
                write!(f, "Web Service updated successfully with {}", relative_location)
            }
            Self::Failed { diagnostic, .. } => f.write_str(diagnostic),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceUpdate<'a> {
    resources: [ResourceEntry<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceEntry<'a> {
    name: &'a str,
    location: ResourceLocation<'a>,
}

// The update endpoint only understands SAS addressing; connection strings are never sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceLocation<'a> {
    base_location: Option<&'a str>,
    relative_location: &'a str,
    sas_blob_token: Option<&'a str>,
}

impl<'a> ResourceUpdate<'a> {
    pub(crate) fn new(service_name: &'a str, artifact: &'a StorageReference) -> Self {
        Self {
            resources: [ResourceEntry {
                name: service_name,
                location: ResourceLocation {
                    base_location: artifact.base_location(),
                    relative_location: artifact.relative_location(),
                    sas_blob_token: artifact.sas_blob_token(),
                },
            }],
        }
    }
}

/// Client for the predictive service's model update endpoint.
#[derive(Clone)]
pub struct EndpointUpdater {
    endpoint_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl EndpointUpdater {
    /// `api_key` is the update endpoint's own key, not the retraining service's.
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self { endpoint_url: endpoint_url.into(), api_key: api_key.into(), transport }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Pushes each artifact to the endpoint, in order, and reports one outcome per artifact.
    ///
    /// # Errors
    /// Only a transport failure (no response at all) aborts the batch.
    pub async fn update(&self, artifacts: &[StorageReference], service_name: &str) -> RetrainResult<Vec<UpdateOutcome>> {
        let mut outcomes = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let payload = ResourceUpdate::new(service_name, artifact);
            let request = HttpRequest::patch(&self.endpoint_url, &self.api_key).with_json(&payload)?;
            let response = self.transport.send(request).await?;

            let relative_location = artifact.relative_location().to_string();
            if response.is_success() {
                info!(artifact = %relative_location, "Endpoint updated");
                outcomes.push(UpdateOutcome::Updated { relative_location });
            } else {
                error!(artifact = %relative_location, status = response.status, "Endpoint update rejected");
                outcomes.push(UpdateOutcome::Failed { relative_location, diagnostic: format_failed_response(&response) });
            }
        }

        Ok(outcomes)
    }
}

impl fmt::Debug for EndpointUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointUpdater").field("endpoint_url", &self.endpoint_url).finish_non_exhaustive()
    }
}
