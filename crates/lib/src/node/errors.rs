//! Error types for node access.
//!
//! This module defines the failures that can occur when reading or mutating the
//! entries of a [`Node`](crate::node::Node) through its path-based accessors.

use thiserror::Error;

/// Structured error types for node access.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum NodeError {
    /// A path resolved to an entry of the wrong kind, or a value had the wrong type
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A string could not be turned into an attribute path
    #[error("invalid attribute path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl NodeError {
    /// Check if this error is a type mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, NodeError::TypeMismatch { .. })
    }

    /// Check if this error is a path validation failure
    pub fn is_path_error(&self) -> bool {
        matches!(self, NodeError::InvalidPath { .. })
    }

    /// Get the path this error refers to
    pub fn path(&self) -> &str {
        match self {
            NodeError::TypeMismatch { path, .. } | NodeError::InvalidPath { path, .. } => path,
        }
    }
}

// Conversion from NodeError to the main Error type
impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
