//! Blob storage references.
//!
//! A reference is addressed in exactly one of two ways: through a storage
//! account connection string, or through a base URL plus shared access
//! signature (SAS) token. On the wire both share the four-field
//! `{ConnectionString, RelativeLocation, BaseLocation, SasBlobToken}` object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a blob to read or write.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlobReferenceWire", into = "BlobReferenceWire")]
pub enum StorageReference {
    /// Regular blob reached through an account connection string.
    ConnectionString { connection_string: String, relative_location: String },
    /// Blob reached through a base URL and, usually, a shared access signature.
    ///
    /// Public containers are reported without a token.
    SharedAccess { base_location: String, relative_location: String, sas_blob_token: Option<String> },
}

impl StorageReference {
    pub fn connection_string(connection_string: impl Into<String>, relative_location: impl Into<String>) -> Self {
        Self::ConnectionString {
            connection_string: connection_string.into(),
            relative_location: relative_location.into(),
        }
    }

    pub fn shared_access(
        base_location: impl Into<String>,
        relative_location: impl Into<String>,
        sas_blob_token: impl Into<String>,
    ) -> Self {
        Self::SharedAccess {
            base_location: base_location.into(),
            relative_location: relative_location.into(),
            sas_blob_token: Some(sas_blob_token.into()),
        }
    }

    /// Container-relative path, `{container}/{blob}`.
    pub fn relative_location(&self) -> &str {
        match self {
            Self::ConnectionString { relative_location, .. } | Self::SharedAccess { relative_location, .. } => {
                relative_location
            }
        }
    }

    pub fn base_location(&self) -> Option<&str> {
        match self {
            Self::SharedAccess { base_location, .. } => Some(base_location),
            Self::ConnectionString { .. } => None,
        }
    }

    pub fn sas_blob_token(&self) -> Option<&str> {
        match self {
            Self::SharedAccess { sas_blob_token, .. } => sas_blob_token.as_deref(),
            Self::ConnectionString { .. } => None,
        }
    }
}

// Connection strings and SAS tokens are credentials; only the location is printed.
impl fmt::Debug for StorageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionString { relative_location, .. } => f
                .debug_struct("ConnectionString")
                .field("relative_location", relative_location)
                .finish_non_exhaustive(),
            Self::SharedAccess { base_location, relative_location, .. } => f
                .debug_struct("SharedAccess")
                .field("base_location", base_location)
                .field("relative_location", relative_location)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobReferenceWire {
    #[serde(default)]
    connection_string: Option<String>,
    #[serde(default)]
    relative_location: Option<String>,
    #[serde(default)]
    base_location: Option<String>,
    #[serde(default)]
    sas_blob_token: Option<String>,
}

impl TryFrom<BlobReferenceWire> for StorageReference {
    type Error = String;

    fn try_from(wire: BlobReferenceWire) -> Result<Self, Self::Error> {
        let relative_location = wire
            .relative_location
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "blob reference is missing RelativeLocation".to_string())?;

        match (wire.base_location, wire.sas_blob_token, wire.connection_string) {
            (Some(base_location), Some(sas_blob_token), _) => {
                Ok(Self::SharedAccess { base_location, relative_location, sas_blob_token: Some(sas_blob_token) })
            }
            (_, _, Some(connection_string)) => Ok(Self::ConnectionString { connection_string, relative_location }),
            (Some(base_location), None, None) => {
                Ok(Self::SharedAccess { base_location, relative_location, sas_blob_token: None })
            }
            _ => Err(format!(
                "blob reference '{}' has neither a connection string nor a base location",
                relative_location
            )),
        }
    }
}

impl From<StorageReference> for BlobReferenceWire {
    fn from(reference: StorageReference) -> Self {
        match reference {
            StorageReference::ConnectionString { connection_string, relative_location } => Self {
                connection_string: Some(connection_string),
                relative_location: Some(relative_location),
                ..Self::default()
            },
            StorageReference::SharedAccess { base_location, relative_location, sas_blob_token } => Self {
                connection_string: None,
                relative_location: Some(relative_location),
                base_location: Some(base_location),
                sas_blob_token,
            },
        }
    }
}

/// Storage account credentials used to build connection-string references.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageAccount {
    account_name: String,
    account_key: String,
}

impl StorageAccount {
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self { account_name: account_name.into(), account_key: account_key.into() }
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// `DefaultEndpointsProtocol=https;AccountName={name};AccountKey={key}`
    pub fn connection_string(&self) -> String {
        format!(
            "DefaultEndpointsProtocol=https;AccountName={};AccountKey={}",
            self.account_name, self.account_key
        )
    }

    /// Reference to `blob_name` inside `container` of this account.
    pub fn blob(&self, container: &str, blob_name: &str) -> StorageReference {
        StorageReference::connection_string(self.connection_string(), format!("{}/{}", container, blob_name))
    }
}

impl fmt::Debug for StorageAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAccount")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}
