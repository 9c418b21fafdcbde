//! Request/response scoring against the predictive service.

use crate::error::{RequestStage, RetrainError, RetrainResult};
use relearn_abstraction::{HttpRequest, Transport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Tabular input: column names plus rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringTable {
    pub column_names: Vec<String>,
    pub values: Vec<Vec<String>>,
}

/// Body of an `execute` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreRequest {
    pub inputs: HashMap<String, StringTable>,
    #[serde(default)]
    pub global_parameters: HashMap<String, String>,
}

/// A successful scoring call. The body is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResponse {
    pub message: String,
    pub body: String,
}

impl ScoreResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> RetrainResult<serde_json::Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| RetrainError::Decode { what: "score response", message: e.to_string() })
    }
}

/// Client for the predictive service's request/response API.
#[derive(Clone)]
pub struct ScoringClient {
    service_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl ScoringClient {
    pub fn new(service_url: impl Into<String>, api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let service_url = service_url.into().trim_end_matches('/').to_string();
        Self { service_url, api_key: api_key.into(), transport }
    }

    fn execute_url(&self) -> String {
        format!("{}/execute?api-version=2.0&details=true", self.service_url)
    }

    pub async fn request_score(&self, request: &ScoreRequest) -> RetrainResult<ScoreResponse> {
        debug!(url = %self.service_url, inputs = request.inputs.len(), "Requesting score");

        let http = HttpRequest::post(self.execute_url(), &self.api_key).with_json(request)?;
        let response = self.transport.send(http).await?;
        if !response.is_success() {
            error!(status = response.status, "Scoring request failed");
            return Err(RetrainError::http(RequestStage::Score, &response));
        }

        Ok(ScoreResponse { message: "Request executed successfully.".to_string(), body: response.body })
    }
}

impl fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringClient").field("service_url", &self.service_url).finish_non_exhaustive()
    }
}
