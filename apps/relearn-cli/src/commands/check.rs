//! Check command implementation.

use crate::config::validated;
use anyhow::Result;
use colored::Colorize;
use relearn_retrain::RelearnConfig;

fn redact(key: &str) -> &'static str {
    if key.is_empty() { "(unset)" } else { "(set)" }
}

/// Print the effective configuration with keys redacted.
pub fn execute(config: &RelearnConfig, json_output: bool) -> Result<()> {
    validated(config.validate())?;

    if json_output {
        let output = serde_json::json!({
            "retrain": {
                "jobs_url": config.retrain.jobs_url,
                "api_key": redact(&config.retrain.api_key),
            },
            "endpoint": {
                "url": config.endpoint.url,
                "api_key": redact(&config.endpoint.api_key),
                "service_name": config.endpoint.service_name,
            },
            "scoring": config.scoring.as_ref().map(|s| serde_json::json!({
                "url": s.url,
                "api_key": redact(&s.api_key),
            })),
            "storage": {
                "account_name": config.storage.account_name,
                "account_key": redact(&config.storage.account_key),
                "input_container": config.storage.input_container,
                "output_container": config.storage.output_container,
            },
            "poll": {
                "timeout_secs": config.poll.timeout_secs,
                "interval_secs": config.poll.interval_secs,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Configuration OK".green().bold());
    println!();
    println!("  retrain.jobs_url         {}", config.retrain.jobs_url);
    println!("  retrain.api_key          {}", redact(&config.retrain.api_key));
    println!("  endpoint.url             {}", config.endpoint.url);
    println!("  endpoint.api_key         {}", redact(&config.endpoint.api_key));
    println!("  endpoint.service_name    {}", config.endpoint.service_name);
    if let Some(scoring) = &config.scoring {
        println!("  scoring.url              {}", scoring.url);
        println!("  scoring.api_key          {}", redact(&scoring.api_key));
    }
    println!("  storage.account_name     {}", config.storage.account_name);
    println!("  storage.account_key      {}", redact(&config.storage.account_key));
    println!("  storage.input_container  {}", config.storage.input_container);
    println!("  storage.output_container {}", config.storage.output_container);
    println!("  poll.timeout_secs        {}", config.poll.timeout_secs);
    println!("  poll.interval_secs       {}", config.poll.interval_secs);
    Ok(())
}
