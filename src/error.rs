//! Error taxonomy for the export and apply engine
//!
//! Engine operations return [`Error`]. Collaborator traits (cloud lookups,
//! schema fetches, cluster writes) return `anyhow::Result` and get wrapped
//! at the boundary with the operation that failed.

use crate::resources::ObjectKey;
use thiserror::Error;

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while building a [`crate::capability::CapabilitySet`]
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("operator version {0:?} is not supported")]
    VersionUnsupported(String),

    #[error("schema for {kind} at version {version} is unavailable: {reason}")]
    SchemaUnavailable {
        kind: String,
        version: String,
        reason: String,
    },
}

/// Failures raised by a [`crate::patcher::Patcher`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("expected object of kind {expected}, got {actual}")]
    UnexpectedKind {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any conversion ran
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// A converter could not build a complete object graph
    #[error("unable to convert {kind}: {message}")]
    Conversion { kind: &'static str, message: String },

    /// A primary cloud lookup failed
    #[error("cloud lookup failed: {operation}")]
    Cloud {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("error patching {key}")]
    Patch {
        key: ObjectKey,
        #[source]
        source: PatchError,
    },

    /// A cluster write failed; `created` objects were left in place
    #[error("failed to create {key} ({created} object(s) already created)")]
    Apply {
        key: ObjectKey,
        created: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to serialize {key}")]
    Serialize {
        key: ObjectKey,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub fn conversion(kind: &'static str, message: impl Into<String>) -> Self {
        Error::Conversion {
            kind,
            message: message.into(),
        }
    }

    pub fn cloud(operation: impl Into<String>, source: anyhow::Error) -> Self {
        Error::Cloud {
            operation: operation.into(),
            source,
        }
    }
}

/// Attach the failed lookup to a collaborator error
pub trait CloudContext<T> {
    fn cloud_context(self, operation: impl FnOnce() -> String) -> Result<T>;
}

impl<T> CloudContext<T> for anyhow::Result<T> {
    fn cloud_context(self, operation: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|source| Error::cloud(operation(), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    #[test]
    fn test_apply_error_reports_progress() {
        let err = Error::Apply {
            key: ObjectKey::new(ResourceKind::Deployment, "c0", "default"),
            created: 3,
            source: anyhow::anyhow!("connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "failed to create AtlasDeployment default/c0 (3 object(s) already created)"
        );
    }

    #[test]
    fn test_cloud_context_wraps_source() {
        let res: anyhow::Result<()> = Err(anyhow::anyhow!("404"));
        let err = res.cloud_context(|| "describe project p1".to_string()).unwrap_err();
        assert!(matches!(err, Error::Cloud { ref operation, .. } if operation == "describe project p1"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
