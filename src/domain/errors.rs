// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the user configuration crate.
//!
//! This module defines the errors that can occur when resolving paths, projecting
//! values and persisting the configuration tree. All errors use `thiserror` for
//! proper error handling and conversion.
//!
//! A path that does not resolve is *not* an error: lookups report absence through
//! a `found` flag on the response types instead.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use usercfg::domain::errors::ConfigError;
///
/// fn stringify_section() -> Result<String, ConfigError> {
///     Err(ConfigError::InvalidOperation {
///         path: "defaults".to_string(),
///         message: "a section cannot be rendered as a string".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The path string is malformed (for example it contains an empty segment).
    #[error("Invalid configuration path '{path}': {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Why the path was rejected
        reason: String,
    },

    /// The resolved value cannot serve the requested operation.
    #[error("Invalid operation on '{path}': {message}")]
    InvalidOperation {
        /// The path the operation targeted
        path: String,
        /// What was incompatible
        message: String,
    },

    /// The mutation was applied in memory but could not be saved.
    #[error("Failed to persist configuration after updating '{path}'; the change may not have been saved: {source}")]
    PersistenceFailure {
        /// The path whose mutation triggered the save
        path: String,
        /// The underlying persistence error
        source: Box<ConfigError>,
    },

    /// The requested operation is not part of the access surface.
    #[error("Operation not implemented: {method}")]
    Unimplemented {
        /// The method name that was requested
        method: String,
    },

    /// An error occurred in a persistence collaborator.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the collaborator that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse or render a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a configuration watcher.
    #[error("Configuration watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvalidPath` error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidOperation` error.
    pub fn invalid_operation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidOperation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wraps a save failure into a `PersistenceFailure` for the given path.
    pub fn persistence(path: impl Into<String>, err: ConfigError) -> Self {
        ConfigError::PersistenceFailure {
            path: path.into(),
            source: Box::new(err),
        }
    }

    /// Returns `true` if the error means a mutation may not have been saved.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, ConfigError::PersistenceFailure { .. })
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_error() {
        let error = ConfigError::invalid_path("a..b", "empty segment");
        assert_eq!(
            error.to_string(),
            "Invalid configuration path 'a..b': empty segment"
        );
    }

    #[test]
    fn test_invalid_operation_error() {
        let error = ConfigError::invalid_operation("defaults", "not a section");
        assert_eq!(
            error.to_string(),
            "Invalid operation on 'defaults': not a section"
        );
    }

    #[test]
    fn test_persistence_failure_wraps_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error = ConfigError::persistence("a.b", ConfigError::from(io_error));

        assert!(error.is_persistence_failure());
        let message = error.to_string();
        assert!(message.contains("a.b"));
        assert!(message.contains("may not have been saved"));
        assert!(message.contains("read-only"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_unimplemented_error() {
        let error = ConfigError::Unimplemented {
            method: "Watch".to_string(),
        };
        assert_eq!(error.to_string(), "Operation not implemented: Watch");
        assert!(!error.is_persistence_failure());
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::SourceError {
            source_name: "file".to_string(),
            message: "Failed to read file".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration source 'file' error: Failed to read file"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }

    #[test]
    fn test_watcher_error() {
        let error = ConfigError::WatcherError {
            message: "File watcher failed".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration watcher error: File watcher failed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }
}
