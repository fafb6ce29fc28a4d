use std::path::PathBuf;

use crate::environment::MIN_JAVA_MAJOR;
use crate::process::ProcessOutcome;
use crate::prompt::PromptError;

/// Where to point users who need a Java runtime.
pub const JAVA_INSTALL_GUIDE: &str = "https://openapi-generator.tech/docs/installation";

/// Error types for the download-and-generate workflow.
///
/// Every variant is terminal: the workflow stops at the first error and
/// nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Reading an answer from the interactive channel failed.
    #[error("failed to read input: {0}")]
    Prompt(#[from] PromptError),

    /// The generator is missing and the user chose not to install it.
    #[error("'{binary}' is not installed; installation was declined")]
    GeneratorInstallDeclined { binary: String },

    /// Installing the generator package failed.
    #[error("failed to install '{package}' with `{command}`: {detail}")]
    GeneratorInstallFailed {
        package: String,
        command: String,
        detail: String,
    },

    /// No usable Java runtime was found.
    #[error(
        "Java {min} or newer is required to run the generator ({detail}); see {guide}",
        min = MIN_JAVA_MAJOR,
        guide = JAVA_INSTALL_GUIDE
    )]
    JavaMissingOrIncompatible { detail: String },

    /// The spec URL could not be parsed.
    #[error("'{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP request failed or returned a non-success status.
    #[error("failed to download '{url}': {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The downloaded document was not JSON. The file has been removed.
    #[error(
        "'{url}' did not return JSON ({source}); enter a URL that serves the OpenAPI spec as a JSON file"
    )]
    InvalidJsonSpec {
        url: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The generator ran and exited non-zero. Scratch files are left in place.
    #[error("`{command}` failed with {}", .outcome.status_label())]
    GenerationFailed {
        command: String,
        outcome: ProcessOutcome,
    },

    /// An external program could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation failed.
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkflowError {
    /// Returns `true` for outcomes that are informational rather than failures.
    pub fn is_declined(&self) -> bool {
        matches!(self, WorkflowError::GeneratorInstallDeclined { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkflowError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_error_mentions_minimum_and_guide() {
        let err = WorkflowError::JavaMissingOrIncompatible {
            detail: "found Java 8".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Java 11 or newer"));
        assert!(msg.contains("found Java 8"));
        assert!(msg.contains(JAVA_INSTALL_GUIDE));
    }

    #[test]
    fn test_generation_failed_reports_status() {
        let err = WorkflowError::GenerationFailed {
            command: "openapi-generator-cli generate".to_string(),
            outcome: ProcessOutcome::failure_with(1, "bad spec"),
        };
        assert_eq!(
            err.to_string(),
            "`openapi-generator-cli generate` failed with exit code 1"
        );
    }

    #[test]
    fn test_only_declined_is_informational() {
        let declined = WorkflowError::GeneratorInstallDeclined {
            binary: "openapi-generator-cli".to_string(),
        };
        assert!(declined.is_declined());
        let io = WorkflowError::io("x", std::io::Error::other("nope"));
        assert!(!io.is_declined());
    }
}
