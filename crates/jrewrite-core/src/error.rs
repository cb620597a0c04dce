//! Error types and handling for rewrite operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for recording and synthesizing rewrites
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The property is not defined on the node kind it was used with
    #[error("Property '{property}' is not defined on {kind}")]
    PropertyMismatch { property: String, kind: String },

    /// A node was used with a rewrite that was created for a different tree
    #[error("Node {kind} at {range} does not belong to the rewritten tree")]
    NodeNotInTree { kind: String, range: String },

    /// The node has no parent property (e.g. the root)
    #[error("Node {kind} has no parent property")]
    NoParentProperty { kind: String },

    /// A child of the wrong class was assigned to a property
    #[error("Cannot place {actual} into '{property}' (expects {expected})")]
    IncompatibleNode {
        property: String,
        expected: String,
        actual: String,
    },

    /// A mandatory child property would end up without a value
    #[error("Mandatory property '{property}' of {kind} cannot be removed")]
    MandatoryPropertyRemoved { property: String, kind: String },

    /// A simple property received a value that is not valid for it
    #[error("Invalid value '{value}' for '{property}': {reason}")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },

    /// A list anchor is not an element of the list
    #[error("Element is not part of list '{property}'")]
    ElementNotInList { property: String },

    /// List index out of range
    #[error("Index {index} is out of bounds for list '{property}' of length {len}")]
    IndexOutOfBounds {
        property: String,
        index: usize,
        len: usize,
    },

    /// The synthesized edit script contains overlapping edits
    #[error("Overlapping edits at {first} and {second}")]
    OverlappingEdits { first: String, second: String },

    /// Formatter errors
    #[error("Formatter error: {message}")]
    FormatterError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Edit script errors
    #[error("Script error in '{operation}': {message}")]
    ScriptError { operation: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Model,
    Validation,
    Synthesis,
    Formatter,
    Config,
    Script,
    Io,
    Internal,
}

impl RewriteError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RewriteError::PropertyMismatch { .. }
            | RewriteError::NodeNotInTree { .. }
            | RewriteError::NoParentProperty { .. }
            | RewriteError::ElementNotInList { .. }
            | RewriteError::IndexOutOfBounds { .. } => ErrorKind::Model,
            RewriteError::IncompatibleNode { .. }
            | RewriteError::MandatoryPropertyRemoved { .. }
            | RewriteError::InvalidValue { .. } => ErrorKind::Validation,
            RewriteError::OverlappingEdits { .. } => ErrorKind::Synthesis,
            RewriteError::FormatterError { .. } => ErrorKind::Formatter,
            RewriteError::ConfigError { .. } => ErrorKind::Config,
            RewriteError::ScriptError { .. } => ErrorKind::Script,
            RewriteError::IoError { .. } => ErrorKind::Io,
            RewriteError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Model | ErrorKind::Validation | ErrorKind::Script
        )
    }

    pub fn property_mismatch(property: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::PropertyMismatch {
            property: property.into(),
            kind: kind.into(),
        }
    }

    pub fn incompatible_node(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::IncompatibleNode {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn mandatory_removed(property: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::MandatoryPropertyRemoved {
            property: property.into(),
            kind: kind.into(),
        }
    }

    pub fn invalid_value(
        property: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            property: property.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter_error(message: impl Into<String>) -> Self {
        Self::FormatterError {
            message: message.into(),
        }
    }

    /// Create a script error for the named operation
    pub fn script_error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScriptError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RewriteError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = RewriteError::property_mismatch("body", "FieldDecl");
        assert_eq!(err.kind(), ErrorKind::Model);
        assert!(err.is_recoverable());

        let err = RewriteError::config_error("bad indent");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = RewriteError::mandatory_removed("name", "MethodDecl");
        assert_eq!(
            err.to_string(),
            "Mandatory property 'name' of MethodDecl cannot be removed"
        );

        let err = RewriteError::invalid_value("identifier", "class", "reserved keyword");
        assert_eq!(
            err.to_string(),
            "Invalid value 'class' for 'identifier': reserved keyword"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RewriteError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
