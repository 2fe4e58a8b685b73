//! Path types for attribute access.
//!
//! Attribute keys in a seria file are flat strings, but many of them follow a dotted
//! naming convention that groups related fields (`m_position.x`, `m_position.y`). The
//! Path/PathBuf types validate such keys and expose their components without ever
//! turning the grouping into a container. They follow the same borrowed/owned pattern
//! as std::path::Path/PathBuf.
//!
//! # Core Types
//!
//! - [`Path`] - An unsized borrowed path type (always behind a reference)
//! - [`PathBuf`] - An owned path type that can be constructed and extended
//! - [`AsPath`] - Conversion trait accepted by every [`Node`](super::Node) accessor
//!
//! # Usage
//!
//! ```rust
//! use seria::node::{Path, PathBuf};
//! use std::str::FromStr;
//!
//! let path = PathBuf::from_str("m_position.x")?;
//! assert_eq!(path.group(), Some("m_position"));
//! assert_eq!(path.field(), "x");
//!
//! let built = PathBuf::from_str("m_position")?.push("y")?;
//! assert_eq!(built.as_str(), "m_position.y");
//!
//! assert!(Path::new("m_position..x").is_err());
//! # Ok::<(), seria::node::NodeError>(())
//! ```

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use super::errors::NodeError;

/// Validates a complete dotted path.
///
/// A path is one or more components separated by dots. Components must be non-empty
/// and may not contain whitespace, `=`, `{` or `}`.
pub fn validate_path(input: &str) -> Result<(), NodeError> {
    if input.is_empty() {
        return Err(invalid(input, "path is empty"));
    }

    for component in input.split('.') {
        validate_component(component).map_err(|reason| invalid(input, reason))?;
    }

    Ok(())
}

fn validate_component(component: &str) -> Result<(), &'static str> {
    if component.is_empty() {
        return Err("empty component");
    }
    if component.chars().any(char::is_whitespace) {
        return Err("components cannot contain whitespace");
    }
    if component.contains(['=', '{', '}']) {
        return Err("components cannot contain '=', '{' or '}'");
    }
    Ok(())
}

fn invalid(path: &str, reason: &str) -> NodeError {
    NodeError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// An owned, validated attribute path.
///
/// # Examples
///
/// ```rust
/// # use seria::node::PathBuf;
/// # use std::str::FromStr;
/// let path = PathBuf::from_str("m_target_pos.x")?;
/// let components: Vec<&str> = path.components().collect();
/// assert_eq!(components, vec!["m_target_pos", "x"]);
/// # Ok::<(), seria::node::NodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed, validated attribute path.
///
/// `Path` is the borrowed counterpart to `PathBuf`, similar to how `&str`
/// relates to `String`. This type is unsized and must always be used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates a path from a string, validating it.
    pub fn new(path: impl Into<String>) -> Result<Self, NodeError> {
        let inner = path.into();
        validate_path(&inner)?;
        Ok(Self { inner })
    }

    /// Appends one or more components to the end of this path.
    ///
    /// The argument may itself be dotted (`"a.b"`); every component is validated.
    pub fn push(mut self, suffix: impl AsRef<str>) -> Result<Self, NodeError> {
        let suffix = suffix.as_ref();
        validate_path(suffix)?;
        self.inner.push('.');
        self.inner.push_str(suffix);
        Ok(self)
    }

    /// Joins this path with another validated path.
    pub fn join(mut self, other: impl AsRef<Path>) -> Self {
        self.inner.push('.');
        self.inner.push_str(other.as_ref().as_str());
        self
    }
}

impl Path {
    /// Validates a string slice and views it as a path.
    pub fn new(s: &str) -> Result<&Path, NodeError> {
        validate_path(s)?;
        // SAFETY: validated above
        Ok(unsafe { Path::from_str_unchecked(s) })
    }

    /// Creates a Path from a string without validation.
    ///
    /// # Safety
    /// The caller must ensure the string satisfies [`validate_path`]. Memory safety
    /// does not depend on it, but every other method of `Path` assumes it.
    pub unsafe fn from_str_unchecked(s: &str) -> &Path {
        // SAFETY: Path is repr(transparent) over str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Returns an iterator over the path components as string slices.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.')
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        self.inner.split('.').count()
    }

    /// A validated path always has at least one component.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns everything before the last component, or `None` for single-component paths.
    ///
    /// `m_position.x` belongs to the `m_position` group.
    pub fn group(&self) -> Option<&str> {
        self.inner.rfind('.').map(|dot| &self.inner[..dot])
    }

    /// Returns the last component of the path.
    pub fn field(&self) -> &str {
        match self.inner.rfind('.') {
            Some(dot) => &self.inner[dot + 1..],
            None => &self.inner,
        }
    }

    /// Returns `true` if this path lies inside the given group.
    pub fn is_in_group(&self, group: &str) -> bool {
        self.inner.len() > group.len()
            && self.inner.starts_with(group)
            && self.inner.as_bytes()[group.len()] == b'.'
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` to an owned `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        // SAFETY: PathBuf contents are validated on construction
        unsafe { Path::from_str_unchecked(self.inner.as_str()) }
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self.deref()
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self.deref()
    }
}

impl FromStr for PathBuf {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathBuf::new(s)
    }
}

impl TryFrom<&str> for PathBuf {
    type Error = NodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PathBuf::new(s)
    }
}

impl TryFrom<String> for PathBuf {
    type Error = NodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PathBuf::new(s)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.inner)
    }
}

/// Anything that can be viewed as a validated [`Path`].
///
/// Node accessors take `impl AsPath` so that both plain string keys and pre-built
/// paths are accepted. Strings are validated on every call; invalid input surfaces
/// as [`NodeError::InvalidPath`].
pub trait AsPath {
    fn as_path(&self) -> Result<&Path, NodeError>;
}

impl AsPath for str {
    fn as_path(&self) -> Result<&Path, NodeError> {
        Path::new(self)
    }
}

impl AsPath for String {
    fn as_path(&self) -> Result<&Path, NodeError> {
        Path::new(self)
    }
}

impl AsPath for Path {
    fn as_path(&self) -> Result<&Path, NodeError> {
        Ok(self)
    }
}

impl AsPath for PathBuf {
    fn as_path(&self) -> Result<&Path, NodeError> {
        Ok(self.deref())
    }
}

impl<T: AsPath + ?Sized> AsPath for &T {
    fn as_path(&self) -> Result<&Path, NodeError> {
        (**self).as_path()
    }
}
