//! Error types for tree transformations.

use thiserror::Error;

/// Structured error types for the transformation toolkit.
///
/// Transformations assume a shape of the tree they operate on. When the tree does
/// not have that shape they fail instead of substituting defaults, since carrying on
/// would produce broken ownership chains.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// An expected child or attribute match was not present
    #[error("structural assumption violated in '{parent}': expected {expected}")]
    StructuralAssumptionViolated { parent: String, expected: String },

    /// A child selector could not be parsed
    #[error("invalid child selector '{input}': {reason}")]
    InvalidSelector { input: String, reason: String },
}

impl TransformError {
    /// Check if this error reports a tree without the expected shape
    pub fn is_structural_error(&self) -> bool {
        matches!(self, TransformError::StructuralAssumptionViolated { .. })
    }

    /// Check if this error reports a bad selector
    pub fn is_selector_error(&self) -> bool {
        matches!(self, TransformError::InvalidSelector { .. })
    }

    /// The classname of the node whose shape was wrong, if any
    pub fn parent(&self) -> Option<&str> {
        match self {
            TransformError::StructuralAssumptionViolated { parent, .. } => Some(parent),
            TransformError::InvalidSelector { .. } => None,
        }
    }
}

// Conversion from TransformError to the main Error type
impl From<TransformError> for crate::Error {
    fn from(err: TransformError) -> Self {
        crate::Error::Transform(err)
    }
}
