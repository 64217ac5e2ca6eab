//! Error types for swiftscale
//!
//! Errors carry the resource they refer to where one is known, so a failed
//! validation points straight at the offending document in the manifest.

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for manifest and harness operations
#[derive(Debug, Error)]
pub enum Error {
    /// A manifest or trigger field is missing or malformed
    #[error("validation error for {resource}: {message}")]
    Validation {
        /// Resource the error refers to (e.g. "ScaledObject/swift-scaledobject")
        resource: String,
        /// Description of what's invalid
        message: String,
        /// The invalid field path (e.g. "spec.triggers[0].metadata.containerName")
        field: Option<String>,
    },

    /// YAML could not be parsed
    #[error("yaml error: {0}")]
    Yaml(#[from] crate::yaml::YamlError),

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },

    /// Local IO failure (temp file, manifest file)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An external command exited unsuccessfully
    #[error("command failed [{command}]: {message}")]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Assertion message plus whatever the command wrote to stderr
        message: String,
    },

    /// One or more steps of a suite failed
    #[error("{} step(s) failed in {suite}: {}", failures.len(), failures.join(", "))]
    SuiteFailed {
        /// Suite name
        suite: String,
        /// Names of the failed steps
        failures: Vec<String>,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g. "harness", "kubectl")
        context: String,
    },
}

impl Error {
    /// Create a validation error without resource context
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            resource: UNKNOWN_CONTEXT.to_string(),
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error for a resource
    pub fn validation_for(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            resource: resource.into(),
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error for a resource and field path
    pub fn validation_for_field(
        resource: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Validation {
            resource: resource.into(),
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error with context
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Field path of a validation error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Resource a validation error refers to
    pub fn resource(&self) -> Option<&str> {
        match self {
            Error::Validation { resource, .. } => Some(resource),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_the_resource_and_field() {
        let err = Error::validation_for_field(
            "ScaledObject/swift-scaledobject",
            "spec.triggers[0].metadata.containerName",
            "no containerName given",
        );
        assert!(err.to_string().contains("ScaledObject/swift-scaledobject"));
        assert!(err.to_string().contains("no containerName given"));
        assert_eq!(err.field(), Some("spec.triggers[0].metadata.containerName"));
        assert_eq!(err.resource(), Some("ScaledObject/swift-scaledobject"));
    }

    #[test]
    fn plain_validation_uses_unknown_context() {
        let err = Error::validation("bad");
        assert_eq!(err.resource(), Some(UNKNOWN_CONTEXT));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn command_failures_keep_the_command_line() {
        let err = Error::command_failed(
            "kubectl -n kedopenstack apply -f /tmp/x",
            "creating scaledObject should work.",
        );
        let msg = err.to_string();
        assert!(msg.contains("kubectl -n kedopenstack apply"));
        assert!(msg.contains("creating scaledObject should work."));
        assert_eq!(err.resource(), None);
    }

    #[test]
    fn suite_failures_list_every_step() {
        let err = Error::SuiteFailed {
            suite: "openstack-swift".to_string(),
            failures: vec!["before".to_string(), "test 1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "2 step(s) failed in openstack-swift: before, test 1"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
