//! Error types for `farthest`
//!
//! A small hierarchy: one top-level error that the CLI maps to an exit code,
//! plus one enum per concern (configuration, host calls, the stdio bridge).

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `farthest` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Host bridge error (malformed stream, closed channel)
    pub const BRIDGE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `farthest` operations.
#[derive(Debug, Error)]
pub enum FarthestError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Host service error that escaped the session
    #[error(transparent)]
    Host(#[from] HostError),

    /// Stdio bridge error
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FarthestError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Bridge(_) => ExitCode::BRIDGE_ERROR,
            Self::Host(_) => ExitCode::ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with the `${VAR:?message}` form
        location: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g., "session.tick_interval")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Host Errors
// ============================================================================

/// Errors reported by host services.
///
/// Most host calls are fire-and-forget and cannot fail from the session's
/// point of view; only scoreboard lookups and mutations report errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The named scoreboard objective does not exist
    #[error("objective not found: {0}")]
    ObjectiveNotFound(String),

    /// An objective with this id already exists
    #[error("objective already exists: {0}")]
    ObjectiveExists(String),

    /// The host service cannot be reached
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Bridge Errors
// ============================================================================

/// Errors raised by the NDJSON stdio bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I/O error on stdin/stdout
    #[error("bridge I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Line framing failed
    #[error("framing error: {0}")]
    Framing(String),

    /// The peer task or channel went away
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl From<tokio_util::codec::LinesCodecError> for BridgeError {
    fn from(err: tokio_util::codec::LinesCodecError) -> Self {
        match err {
            tokio_util::codec::LinesCodecError::Io(e) => Self::Io(e),
            tokio_util::codec::LinesCodecError::MaxLineLengthExceeded => {
                Self::Framing("line exceeds maximum length".to_string())
            }
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `farthest` operations.
pub type Result<T> = std::result::Result<T, FarthestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::BRIDGE_ERROR, 4);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: FarthestError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_bridge_error_exit_code() {
        let err: FarthestError = BridgeError::ChannelClosed("stdout".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::BRIDGE_ERROR);
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = FarthestError::Usage("missing --config".to_string());
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: FarthestError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_lines_codec_overflow_maps_to_framing() {
        let err: BridgeError = tokio_util::codec::LinesCodecError::MaxLineLengthExceeded.into();
        assert!(matches!(err, BridgeError::Framing(_)));
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "session.tick_interval".to_string(),
            message: "must be at least 10ms".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: must be at least 10ms at session.tick_interval"
        );
    }

    #[test]
    fn test_host_error_display() {
        let err = HostError::ObjectiveNotFound("distance".to_string());
        assert_eq!(err.to_string(), "objective not found: distance");
    }
}
