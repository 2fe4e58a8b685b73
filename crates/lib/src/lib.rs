//!
//! Seria: an order-preserving reader and writer for the `.seria` object format.
//! This library loads game objects (ships, fleets, world saves, item libraries) into
//! an editable tree and writes them back so that everything the caller did not touch
//! is reproduced byte for byte.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: One game object: a classname, a type code and a single ordered sequence of attributes and child nodes. Order in that sequence is file order.
//! * **Values (`node::Value`)**: Typed scalar content (integer, float, boolean, string) that remembers the exact text it was read from.
//! * **Paths (`node::Path`)**: Validated dotted attribute keys such as `m_position.x`, stored flat.
//! * **Format (`format`)**: The parser and writer. Unmodified trees round-trip exactly; new or modified entries get a canonical layout.
//! * **Identifiers (`id::IdGenerator`)**: Random `m_id` values for grafted or newly built subtrees.
//! * **Transformations (`transform`)**: Pruning, "must exist" lookups and top-down re-linking of `m_master_id`/`m_owner_id` chains.
//! * **Roster (`roster`)**: Fleet editing on world saves built from the above: ship compaction, escadra construction and summaries.

pub mod constants;
pub mod format;
pub mod id;
pub mod node;
pub mod roster;
pub mod transform;

/// Re-export the `Node` struct for easier access.
pub use node::Node;

/// Result type used throughout the seria library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the seria library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured parse errors from the format module
    #[error(transparent)]
    Format(format::FormatError),

    /// Structured attribute and child access errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured errors from the transform module
    #[error(transparent)]
    Transform(transform::TransformError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io { .. } => "io",
            Error::Format(_) => "format",
            Error::Node(_) => "node",
            Error::Transform(_) => "transform",
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// Check if this error reports a document that could not be parsed.
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::Format(format_err) => format_err.is_malformed(),
            _ => false,
        }
    }

    /// Check if this error is a type mismatch between attribute and child entries
    /// or between a value and the requested type.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is an invalid attribute path or selector.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_path_error(),
            Error::Transform(transform_err) => transform_err.is_selector_error(),
            _ => false,
        }
    }

    /// Check if this error reports a tree without the shape a transformation expected.
    pub fn is_structural_error(&self) -> bool {
        match self {
            Error::Transform(transform_err) => transform_err.is_structural_error(),
            _ => false,
        }
    }
}
