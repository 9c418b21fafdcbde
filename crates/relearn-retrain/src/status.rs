use crate::storage::StorageReference;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Lifecycle state of a remote retrain job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JobStatusCode {
    NotStarted,
    Running,
    Failed,
    Cancelled,
    Finished,
}

impl JobStatusCode {
    /// True for states after which the service reports nothing new.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::Finished)
    }
}

impl fmt::Display for JobStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// The service names states as strings; older deployments send the ordinal.
impl<'de> Deserialize<'de> for JobStatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Ordinal(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => match name.as_str() {
                "NotStarted" => Ok(Self::NotStarted),
                "Running" => Ok(Self::Running),
                "Failed" => Ok(Self::Failed),
                "Cancelled" => Ok(Self::Cancelled),
                "Finished" => Ok(Self::Finished),
                _ => Err(serde::de::Error::custom(format!("Unknown job status: {}", name))),
            },
            Raw::Ordinal(0) => Ok(Self::NotStarted),
            Raw::Ordinal(1) => Ok(Self::Running),
            Raw::Ordinal(2) => Ok(Self::Failed),
            Raw::Ordinal(3) => Ok(Self::Cancelled),
            Raw::Ordinal(4) => Ok(Self::Finished),
            Raw::Ordinal(n) => Err(serde::de::Error::custom(format!("Unknown job status: {}", n))),
        }
    }
}

/// One status report fetched from the job's status URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobStatus {
    pub status_code: JobStatusCode,
    /// Output slot → produced blob. Only populated once the job has finished.
    #[serde(default, deserialize_with = "lenient_results")]
    pub results: Option<HashMap<String, StorageReference>>,
    /// Error details, if any.
    #[serde(default)]
    pub details: Option<String>,
}

// Unreadable entries are dropped with a warning; the rest of the map is kept.
fn lenient_results<'de, D>(deserializer: D) -> Result<Option<HashMap<String, StorageReference>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<serde_json::Value>>> = Option::deserialize(deserializer)?;

    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(slot, value)| {
                let Some(value) = value else {
                    warn!(slot = %slot, "Skipping empty job result");
                    return None;
                };
                match StorageReference::deserialize(value) {
                    Ok(reference) => Some((slot, reference)),
                    Err(e) => {
                        warn!(slot = %slot, error = %e, "Skipping unreadable job result");
                        None
                    }
                }
            })
            .collect()
    }))
}

impl JobStatus {
    pub fn new(status_code: JobStatusCode) -> Self {
        Self { status_code, results: None, details: None }
    }

    #[must_use]
    pub fn with_result(mut self, slot: impl Into<String>, reference: StorageReference) -> Self {
        self.results.get_or_insert_with(HashMap::new).insert(slot.into(), reference);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
