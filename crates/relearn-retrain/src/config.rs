//! Configuration file support.
//!
//! Settings live in a TOML file with one section per remote service, a
//! storage section and optional polling overrides. API keys may be left out
//! of the file and supplied through environment variables instead.

use crate::storage::StorageAccount;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default upper bound on how long a retrain job is polled.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default wait between status polls.
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Environment variable overriding `retrain.api_key`.
pub const ENV_RETRAIN_API_KEY: &str = "RELEARN_RETRAIN_API_KEY";
/// Environment variable overriding `endpoint.api_key`.
pub const ENV_ENDPOINT_API_KEY: &str = "RELEARN_ENDPOINT_API_KEY";
/// Environment variable overriding `scoring.api_key`.
pub const ENV_SCORING_API_KEY: &str = "RELEARN_SCORING_API_KEY";
/// Environment variable overriding `storage.account_key`.
pub const ENV_STORAGE_ACCOUNT_KEY: &str = "RELEARN_STORAGE_ACCOUNT_KEY";

/// Polling limits for a retrain job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds after which the job is deleted and polling gives up.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds to wait between status requests.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_TIMEOUT_SECS, interval_secs: DEFAULT_INTERVAL_SECS }
    }
}

impl PollConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("poll.timeout_secs must be > 0".to_string()));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidValue("poll.interval_secs must be > 0".to_string()));
        }
        if self.interval_secs > self.timeout_secs {
            return Err(ConfigError::InvalidValue(
                "poll.interval_secs must not exceed poll.timeout_secs".to_string(),
            ));
        }
        Ok(())
    }
}

/// Retraining service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainSection {
    /// Jobs collection URL of the retraining service.
    pub jobs_url: String,
    pub api_key: String,
}

/// Update endpoint of the predictive service.
///
/// Its key belongs to the update endpoint, not to the predictive service's
/// default endpoint and not to the retraining service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSection {
    pub url: String,
    pub api_key: String,
    /// Resource name of the trained model inside the predictive service.
    pub service_name: String,
}

/// Predictive service used for scoring requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSection {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Storage account holding training data and trained models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub account_name: String,
    pub account_key: String,
    /// Container new training data arrives in.
    pub input_container: String,
    /// Container trained models are written to.
    pub output_container: String,
}

/// Complete configuration file.
///
/// Every section may be left out; each command validates only the sections it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelearnConfig {
    #[serde(default)]
    pub retrain: RetrainSection,
    #[serde(default)]
    pub endpoint: EndpointSection,
    #[serde(default)]
    pub scoring: Option<ScoringSection>,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub poll: PollConfig,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl RelearnConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError(msg) => ConfigError::ParseError(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Get default global configuration file path.
    #[allow(clippy::disallowed_methods)] // HOME lookup for the global config
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".relearn")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from("relearn.toml")
    }

    /// Locate and load the configuration file.
    ///
    /// An explicit path wins. Otherwise `./relearn.toml` is tried, then
    /// `~/.relearn/config.toml`.
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let local = Self::default_local_path();
        if local.exists() {
            return Self::load_from_file(&local);
        }

        let global = Self::default_global_path();
        if global.exists() {
            return Self::load_from_file(&global);
        }

        Err(ConfigError::NotFound(format!("{} or {}", local.display(), global.display())))
    }

    /// Replace API keys with values from the process environment, when set.
    #[allow(clippy::disallowed_methods)] // env::var is needed for API key loading
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Replace API keys with values produced by `lookup`, when it yields a non-empty value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = non_empty(ENV_RETRAIN_API_KEY) {
            self.retrain.api_key = key;
        }
        if let Some(key) = non_empty(ENV_ENDPOINT_API_KEY) {
            self.endpoint.api_key = key;
        }
        if let Some(key) = non_empty(ENV_STORAGE_ACCOUNT_KEY) {
            self.storage.account_key = key;
        }
        if let (Some(scoring), Some(key)) = (self.scoring.as_mut(), non_empty(ENV_SCORING_API_KEY)) {
            scoring.api_key = key;
        }
    }

    /// Check every section present in the file, as needed for a retrain-and-update run.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_retrain()?;
        self.validate_endpoint()?;
        self.validate_storage()?;
        if self.scoring.is_some() {
            self.validate_scoring()?;
        }
        Ok(())
    }

    /// Retraining service and polling limits.
    pub fn validate_retrain(&self) -> ConfigResult<()> {
        require("retrain.jobs_url", &self.retrain.jobs_url)?;
        require("retrain.api_key", &self.retrain.api_key)?;
        self.poll.validate()
    }

    pub fn validate_endpoint(&self) -> ConfigResult<()> {
        require("endpoint.url", &self.endpoint.url)?;
        require("endpoint.api_key", &self.endpoint.api_key)?;
        require("endpoint.service_name", &self.endpoint.service_name)
    }

    pub fn validate_storage(&self) -> ConfigResult<()> {
        require("storage.account_name", &self.storage.account_name)?;
        require("storage.account_key", &self.storage.account_key)?;
        require("storage.input_container", &self.storage.input_container)?;
        require("storage.output_container", &self.storage.output_container)
    }

    /// The scoring section is optional in the file but required here.
    pub fn validate_scoring(&self) -> ConfigResult<&ScoringSection> {
        let scoring = self
            .scoring
            .as_ref()
            .ok_or_else(|| ConfigError::InvalidValue("[scoring] section is required".to_string()))?;
        require("scoring.url", &scoring.url)?;
        require("scoring.api_key", &scoring.api_key)?;
        Ok(scoring)
    }

    pub fn storage_account(&self) -> StorageAccount {
        StorageAccount::new(&self.storage.account_name, &self.storage.account_key)
    }
}

fn require(name: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue(format!("{} is required", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
[retrain]
jobs_url = "https://svc.test/workspaces/w/services/s/jobs"
api_key = "retrain-key"

[endpoint]
url = "https://mgmt.test/workspaces/w/webservices/p/endpoints/update"
api_key = "endpoint-key"
service_name = "Retrain Model [trained model]"

[storage]
account_name = "acct"
account_key = "account-key"
input_container = "container"
output_container = "container-learnings"
"#;

    #[test]
    fn test_parse_sample_uses_poll_defaults() {
        let config = RelearnConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.poll, PollConfig::default());
        assert_eq!(config.poll.timeout(), Duration::from_secs(120));
        assert_eq!(config.poll.interval(), Duration::from_secs(1));
        assert!(config.scoring.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_poll_section_overrides_defaults() {
        let content = format!("{}\n[poll]\ntimeout_secs = 30\n", SAMPLE);
        let config = RelearnConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.poll.timeout_secs, 30);
        assert_eq!(config.poll.interval_secs, DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn test_poll_validation() {
        assert!(PollConfig { timeout_secs: 0, interval_secs: 1 }.validate().is_err());
        assert!(PollConfig { timeout_secs: 10, interval_secs: 0 }.validate().is_err());
        assert!(PollConfig { timeout_secs: 10, interval_secs: 11 }.validate().is_err());
        assert!(PollConfig { timeout_secs: 10, interval_secs: 10 }.validate().is_ok());
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let content = SAMPLE.replace("api_key = \"endpoint-key\"\n", "");
        let config = RelearnConfig::from_toml_str(&content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint.api_key"));
    }

    #[test]
    fn test_overrides_fill_keys() {
        let content = SAMPLE.replace("api_key = \"retrain-key\"\n", "");
        let mut config = RelearnConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());

        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_RETRAIN_API_KEY, "from-env"), (ENV_ENDPOINT_API_KEY, "")]);
        config.apply_overrides(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.retrain.api_key, "from-env");
        // Empty values do not clobber the file.
        assert_eq!(config.endpoint.api_key, "endpoint-key");
        config.validate().unwrap();
    }

    #[test]
    fn test_scoring_only_config() {
        let content = "[scoring]\nurl = \"https://svc.test/score\"\napi_key = \"scoring-key\"\n";
        let config = RelearnConfig::from_toml_str(content).unwrap();

        assert_eq!(config.validate_scoring().unwrap().url, "https://svc.test/score");
        let err = config.validate_retrain().unwrap_err();
        assert!(err.to_string().contains("retrain.jobs_url"));
        assert!(config.validate_endpoint().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scoring_required_only_when_asked() {
        let config = RelearnConfig::from_toml_str(SAMPLE).unwrap();
        config.validate().unwrap();
        let err = config.validate_scoring().unwrap_err();
        assert!(err.to_string().contains("[scoring]"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = RelearnConfig::from_toml_str("[retrain\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relearn.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = RelearnConfig::load_from_file(&path).unwrap();
        assert_eq!(config.storage.input_container, "container");
        assert_eq!(
            config.storage_account().connection_string(),
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=account-key"
        );

        let missing = dir.path().join("absent.toml");
        assert!(matches!(RelearnConfig::load_from_file(&missing), Err(ConfigError::NotFound(_))));
        assert!(RelearnConfig::discover(Some(&path)).is_ok());
    }
}
