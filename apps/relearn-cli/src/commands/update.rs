//! Update command implementation.

use super::report_outcomes;
use crate::config::validated;
use anyhow::{Result, bail};
use relearn_http::ReqwestTransport;
use relearn_retrain::{EndpointUpdater, RelearnConfig, StorageReference};
use std::sync::Arc;
use tracing::info;

/// Execute the update command.
pub async fn execute(
    config: &RelearnConfig,
    relative_location: &str,
    base_location: &str,
    sas_token: &str,
) -> Result<()> {
    validated(config.validate_endpoint())?;

    let artifact = StorageReference::shared_access(base_location, relative_location, sas_token);
    let updater = EndpointUpdater::new(&config.endpoint.url, &config.endpoint.api_key, Arc::new(ReqwestTransport::new()));

    info!(artifact = %relative_location, endpoint = %updater.endpoint_url(), "Updating endpoint");
    let outcomes = updater.update(&[artifact], &config.endpoint.service_name).await?;
    report_outcomes(&outcomes, true);

    if outcomes.iter().any(|o| !o.is_success()) {
        bail!("Endpoint update failed");
    }
    Ok(())
}
