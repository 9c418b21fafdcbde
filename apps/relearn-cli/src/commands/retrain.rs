//! Retrain command implementation.

use super::report_outcomes;
use crate::config::validated;
use anyhow::{Result, bail};
use colored::Colorize;
use relearn_http::ReqwestTransport;
use relearn_retrain::{RelearnConfig, RetrainPipeline};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Suffix appended to the input blob's stem to name the trained model blob.
const OUTPUT_SUFFIX: &str = "_outputresults.ilearner";

/// Execute the retrain command.
pub async fn execute(config: &RelearnConfig, blob_name: &str, json_output: bool) -> Result<()> {
    validated(config.validate_retrain())?;
    validated(config.validate_endpoint())?;
    validated(config.validate_storage())?;

    let account = config.storage_account();
    let input = account.blob(&config.storage.input_container, blob_name);
    let output = account.blob(&config.storage.output_container, &output_blob_name(blob_name));

    info!(input = %input.relative_location(), output = %output.relative_location(), "Retraining of Machine Learning model started...");

    let pipeline = RetrainPipeline::from_config(config, Arc::new(ReqwestTransport::new()));
    let report = match pipeline.run(&input, &output).await {
        Ok(report) => {
            info!("Retraining finished successfully.");
            report
        }
        Err(e) => {
            error!(error = %e, "Retraining finished with an error.");
            return Err(e.into());
        }
    };

    if json_output {
        report_outcomes(&report.outcomes, false);
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "relative_location": o.relative_location(),
                    "updated": o.is_success(),
                    "message": o.to_string(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "job_id": report.job_id,
            "message": report.retrain_message,
            "updates": outcomes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("{} {}", "✓".green(), report.retrain_message);
        if report.outcomes.is_empty() {
            println!("  {}", "No trained model artifacts to push".yellow());
        }
        report_outcomes(&report.outcomes, true);
        println!();
    }

    let failed = report.outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        bail!("{failed} of {} endpoint updates failed", report.outcomes.len());
    }

    Ok(())
}

/// Name of the trained model blob produced from `blob_name`.
fn output_blob_name(blob_name: &str) -> String {
    let stem = Path::new(blob_name).file_stem().and_then(|s| s.to_str()).unwrap_or(blob_name);
    format!("{stem}{OUTPUT_SUFFIX}")
}
