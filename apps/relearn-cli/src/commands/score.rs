//! Score command implementation.

use crate::config::validated;
use anyhow::{Context, Result};
use relearn_http::ReqwestTransport;
use relearn_retrain::{RelearnConfig, ScoreRequest, ScoringClient};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Execute the score command.
pub async fn execute(config: &RelearnConfig, request_path: &Path) -> Result<()> {
    let scoring = validated(config.validate_scoring())?;

    let content = std::fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read request file {}", request_path.display()))?;
    let request: ScoreRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid scoring request in {}", request_path.display()))?;

    let client = ScoringClient::new(&scoring.url, &scoring.api_key, Arc::new(ReqwestTransport::new()));
    let response = client.request_score(&request).await?;
    info!("{}", response.message);

    match response.json() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.body),
    }
    Ok(())
}
