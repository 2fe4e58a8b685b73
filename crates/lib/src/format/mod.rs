//! Reading and writing the seria text format.
//!
//! A document is a single root node. [`parse`] turns text into a [`Node`] tree and
//! [`write`] turns it back; writing an unmodified parse result reproduces the input
//! byte for byte, including indentation, blank lines, line endings and the exact
//! spelling of every value.
//!
//! ```
//! use seria::format;
//!
//! let text = "Escadra 327\r\n{\r\n    m_name=DERBENT\r\n    m_position.x=010.50\r\n}\r\n";
//! let mut escadra = format::parse(text)?;
//! assert_eq!(format::write(&escadra), text);
//!
//! escadra.set("m_role", 2)?;
//! assert_eq!(
//!     format::write(&escadra),
//!     "Escadra 327\r\n{\r\n    m_name=DERBENT\r\n    m_position.x=010.50\n\tm_role=2\r\n}\r\n"
//! );
//! # Ok::<(), seria::Error>(())
//! ```

use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Error, Result, node::Node};

pub mod errors;
mod parser;
mod writer;

pub use errors::FormatError;
pub use writer::{FormatOptions, LineEnding, write, write_with};

/// Parses a complete document.
///
/// The whole input must be one root node, optionally surrounded by whitespace and
/// preceded by a byte order mark.
pub fn parse(text: &str) -> std::result::Result<Node, FormatError> {
    let root = parser::Parser::new(text).parse_document()?;
    debug!(
        classname = root.classname(),
        entries = root.len(),
        bytes = text.len(),
        "parsed document"
    );
    Ok(root)
}

/// Reads and parses a UTF-8 document from disk.
pub fn read_file(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading document");
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text)?)
}

/// Writes `node` as a document with default options.
pub fn write_file(path: impl AsRef<Path>, node: &Node) -> Result<()> {
    write_file_with(path, node, &FormatOptions::default())
}

/// Writes `node` as a document.
///
/// The text goes to a temporary file in the destination directory which is then
/// renamed over `path`, so readers never observe a partially written file.
pub fn write_file_with(path: impl AsRef<Path>, node: &Node, options: &FormatOptions) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let text = write_with(node, options);
    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|err| io_err(err.error))?;

    debug!(path = %path.display(), bytes = text.len(), "wrote document");
    Ok(())
}
