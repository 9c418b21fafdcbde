//! Relearn CLI - retrain a model on new data and push it to the predictive service.
//!
//! Provides the `relearn` command: retrain on a freshly arrived blob, push an
//! existing model blob to the update endpoint, score a request, or check the
//! configuration.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Relearn - retrain-and-update orchestration for a remote model-serving platform
#[derive(Parser, Debug)]
#[command(name = "relearn", author, version, about = "Relearn - retrain and update hosted models")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (defaults to ./relearn.toml, then ~/.relearn/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrain on a blob from the input container and update the predictive endpoint
    ///
    /// The trained model is written to the output container as
    /// `{blob stem}_outputresults.ilearner`.
    Retrain {
        /// Blob name inside the configured input container
        blob_name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Push an existing trained model blob to the predictive endpoint
    Update {
        /// Container-relative path of the .ilearner blob
        relative_location: String,

        /// Base URL of the storage account's blob service
        #[arg(long)]
        base_location: String,

        /// Shared access signature for the blob
        #[arg(long)]
        sas_token: String,
    },

    /// Send a scoring request read from a JSON file
    Score {
        /// Path to the request body ({"Inputs": ..., "GlobalParameters": ...})
        request: PathBuf,
    },

    /// Validate the configuration and print the effective settings
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Retrain { blob_name, json } => commands::retrain::execute(&config, &blob_name, json).await,
        Command::Update { relative_location, base_location, sas_token } => {
            commands::update::execute(&config, &relative_location, &base_location, &sas_token).await
        }
        Command::Score { request } => commands::score::execute(&config, &request).await,
        Command::Check { json } => commands::check::execute(&config, json),
    }
}
