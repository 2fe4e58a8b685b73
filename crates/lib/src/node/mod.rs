//! The node tree.
//!
//! A [`Node`] is one object of the game's object graph: a classname, an integer type
//! code and a single ordered sequence of [`Entry`] values mixing scalar attributes and
//! owned child nodes. Order in that sequence is serialization order. Nothing in this
//! module reorders entries unless the caller asks for it explicitly.
//!
//! # Usage
//!
//! ```
//! use seria::node::{Node, SplicePolicy};
//!
//! let mut escadra = Node::new("Escadra", 327);
//! escadra.set("m_name", "DERBENT")?;
//! escadra.set("m_position.x", 10.5)?;
//!
//! let ship = Node::new("Ship", 7);
//! escadra.splice_children("m_children", 7, vec![ship], SplicePolicy::Append);
//!
//! assert_eq!(escadra.get_as::<&str>("m_name")?, Some("DERBENT"));
//! assert_eq!(escadra.children_by_slot("m_children")?.len(), 1);
//! # Ok::<(), seria::node::NodeError>(())
//! ```
//!
//! Cross references between nodes (`m_master_id`, `m_owner_id`) are plain integer
//! attributes resolved by lookup. The tree owns its children and nothing else.

use std::fmt;

use serde::Serialize;

use crate::constants::{ID, MASTER_ID, OWNER_ID};

pub mod errors;
pub mod path;
pub mod value;

pub use errors::NodeError;
pub use path::{AsPath, Path, PathBuf};
pub use value::{Scalar, Value};

/// Where [`Node::splice_children`] places a run of new children.
///
/// Some child groups are expected by the game at a particular point relative to their
/// siblings, so placement is always an explicit choice of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplicePolicy {
    /// Insert immediately before the first existing child in the same slot, or append
    /// when the slot is empty.
    BeforeFirstOfSlot,
    /// Append after the last entry.
    Append,
}

/// Header text as it appeared in the source, with the fields it spelled out.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawHeader {
    pub(crate) text: String,
    pub(crate) slot: Option<String>,
    pub(crate) classname: String,
    pub(crate) code: i64,
}

/// Source whitespace around a node. `None` means canonical layout.
#[derive(Debug, Clone, Default)]
pub(crate) struct Layout {
    /// Text before the header: the entry lead for a child, leading whitespace for a root
    pub(crate) before: Option<String>,
    pub(crate) header: Option<RawHeader>,
    /// Text between the header and `{`
    pub(crate) open: Option<String>,
    /// Text between the last entry and `}`
    pub(crate) close: Option<String>,
    /// Text after `}`; only meaningful on a document root
    pub(crate) after: Option<String>,
}

/// A scalar attribute entry.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    key: String,
    #[serde(rename = "value")]
    scalar: Scalar,
    #[serde(skip)]
    pub(crate) lead: Option<String>,
}

impl Attribute {
    pub(crate) fn parsed(key: String, scalar: Scalar, lead: String) -> Self {
        Self {
            key,
            scalar,
            lead: Some(lead),
        }
    }

    fn new(key: &Path, value: Value) -> Self {
        Self {
            key: key.as_str().to_string(),
            scalar: Scalar::new(value),
            lead: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        self.scalar.value()
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.scalar == other.scalar
    }
}

/// A child entry: a slot name and the owned sub-tree stored under it.
///
/// The entry's code is the child's own [`Node::code`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Child {
    slot: String,
    node: Node,
}

impl Child {
    pub fn new(slot: impl Into<String>, node: Node) -> Self {
        Self {
            slot: slot.into(),
            node,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn code(&self) -> i64 {
        self.node.code
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }
}

/// One element of a node's ordered entry sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// `key=value`
    Scalar(Attribute),
    /// A nested node block stored under a slot
    Child(Child),
}

impl Entry {
    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Entry::Scalar(attr) => Some(attr),
            Entry::Child(_) => None,
        }
    }

    pub fn as_child(&self) -> Option<&Child> {
        match self {
            Entry::Child(child) => Some(child),
            Entry::Scalar(_) => None,
        }
    }

    pub fn is_child(&self) -> bool {
        matches!(self, Entry::Child(_))
    }

    fn is_key(&self, key: &str) -> bool {
        matches!(self, Entry::Scalar(attr) if attr.key == key)
    }

    fn is_slot(&self, slot: &str) -> bool {
        matches!(self, Entry::Child(child) if child.slot == slot)
    }
}

/// One object in the serialized tree.
///
/// Equality is structural: classname, code and entries (keys, values, slots and
/// children) are compared, source formatting is not.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    classname: String,
    code: i64,
    entries: Vec<Entry>,
    #[serde(skip)]
    pub(crate) layout: Layout,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.classname == other.classname
            && self.code == other.code
            && self.entries == other.entries
    }
}

impl Node {
    /// Creates an empty node
    pub fn new(classname: impl Into<String>, code: i64) -> Self {
        Self {
            classname: classname.into(),
            code,
            entries: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub(crate) fn from_parts(
        classname: String,
        code: i64,
        entries: Vec<Entry>,
        layout: Layout,
    ) -> Self {
        Self {
            classname,
            code,
            entries,
            layout,
        }
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    pub fn set_classname(&mut self, classname: impl Into<String>) {
        self.classname = classname.into();
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn set_code(&mut self, code: i64) {
        self.code = code;
    }

    /// All entries in serialization order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of direct entries, attributes and children together
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct scalar attributes in order
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter().filter_map(Entry::as_attribute)
    }

    /// Direct children in order
    pub fn children(&self) -> impl Iterator<Item = &Child> {
        self.entries.iter().filter_map(Entry::as_child)
    }

    /// Direct children in order, mutably
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Child> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            Entry::Child(child) => Some(child),
            Entry::Scalar(_) => None,
        })
    }

    fn attribute_index(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.is_key(key))
    }

    fn child_mismatch(&self, path: &Path) -> Result<(), NodeError> {
        if self.entries.iter().any(|entry| entry.is_slot(path.as_str())) {
            return Err(NodeError::TypeMismatch {
                path: path.as_str().to_string(),
                expected: "attribute".to_string(),
                found: "child".to_string(),
            });
        }
        Ok(())
    }

    /// Resolves a dotted attribute path against the direct entries.
    ///
    /// Returns `Ok(None)` when absent and a `TypeMismatch` when the path names a
    /// child slot instead of an attribute.
    pub fn get(&self, path: impl AsPath) -> Result<Option<&Value>, NodeError> {
        Ok(self.get_scalar(path)?.map(Scalar::value))
    }

    /// Like [`get`](Self::get), but returns the scalar with its source text.
    pub fn get_scalar(&self, path: impl AsPath) -> Result<Option<&Scalar>, NodeError> {
        let path = path.as_path()?;
        match self.attributes().find(|attr| attr.key == path.as_str()) {
            Some(attr) => Ok(Some(attr.scalar())),
            None => {
                self.child_mismatch(path)?;
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get), falling back to `default` when the attribute is absent.
    pub fn get_or(&self, path: impl AsPath, default: impl Into<Value>) -> Result<Value, NodeError> {
        Ok(self.get(path)?.cloned().unwrap_or_else(|| default.into()))
    }

    /// Gets an attribute converted to `T`.
    ///
    /// Absence is `Ok(None)`; a value of the wrong type is a `TypeMismatch`.
    ///
    /// ```
    /// # use seria::node::Node;
    /// let mut node = Node::new("Creature", 47);
    /// node.set("m_alignment", -1)?;
    /// assert_eq!(node.get_as::<i64>("m_alignment")?, Some(-1));
    /// assert_eq!(node.get_as::<i64>("m_missing")?, None);
    /// assert!(node.get_as::<bool>("m_alignment").is_err());
    /// # Ok::<(), seria::node::NodeError>(())
    /// ```
    pub fn get_as<'a, T>(&'a self, path: impl AsPath) -> Result<Option<T>, NodeError>
    where
        T: TryFrom<&'a Value, Error = NodeError>,
    {
        let path = path.as_path()?;
        match self.get(path)? {
            Some(value) => T::try_from(value).map(Some).map_err(|err| match err {
                NodeError::TypeMismatch {
                    expected, found, ..
                } => NodeError::TypeMismatch {
                    path: path.as_str().to_string(),
                    expected,
                    found,
                },
                other => other,
            }),
            None => Ok(None),
        }
    }

    /// Like [`get_as`](Self::get_as), falling back to `default` when absent.
    pub fn get_as_or<'a, T>(&'a self, path: impl AsPath, default: T) -> Result<T, NodeError>
    where
        T: TryFrom<&'a Value, Error = NodeError>,
    {
        Ok(self.get_as(path)?.unwrap_or(default))
    }

    /// Returns true if a scalar attribute exists at `path`.
    pub fn contains_key(&self, path: impl AsPath) -> Result<bool, NodeError> {
        Ok(self.get(path)?.is_some())
    }

    /// Sets an attribute.
    ///
    /// An existing attribute is updated in place and keeps its position; a new one is
    /// appended after the last entry. Child entries are never touched. Returns the
    /// previous value.
    pub fn set(
        &mut self,
        path: impl AsPath,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, NodeError> {
        let path = path.as_path()?;
        let value = value.into();

        if let Some(index) = self.attribute_index(path.as_str()) {
            if let Entry::Scalar(attr) = &mut self.entries[index] {
                return Ok(Some(attr.scalar.replace(value)));
            }
        }

        self.child_mismatch(path)?;
        tracing::trace!(key = path.as_str(), "appending attribute");
        self.entries.push(Entry::Scalar(Attribute::new(path, value)));
        Ok(None)
    }

    /// Removes one attribute, returning its value, or `None` if it was absent.
    pub fn remove(&mut self, path: impl AsPath) -> Result<Option<Value>, NodeError> {
        let path = path.as_path()?;
        if let Some(index) = self.attribute_index(path.as_str()) {
            if let Entry::Scalar(attr) = self.entries.remove(index) {
                return Ok(Some(attr.scalar.into_value()));
            }
        }

        self.child_mismatch(path)?;
        Ok(None)
    }

    fn slot_mismatch(&self, slot: &str) -> Result<(), NodeError> {
        if self.entries.iter().any(|entry| entry.is_key(slot)) {
            return Err(NodeError::TypeMismatch {
                path: slot.to_string(),
                expected: "child".to_string(),
                found: "attribute".to_string(),
            });
        }
        Ok(())
    }

    /// All children stored under `slot`, in order, regardless of code.
    ///
    /// Fails with `TypeMismatch` when `slot` names an attribute and no child.
    pub fn children_by_slot(&self, slot: &str) -> Result<Vec<&Node>, NodeError> {
        let found: Vec<&Node> = self
            .children()
            .filter(|child| child.slot == slot)
            .map(Child::node)
            .collect();
        if found.is_empty() {
            self.slot_mismatch(slot)?;
        }
        Ok(found)
    }

    /// Mutable variant of [`children_by_slot`](Self::children_by_slot).
    pub fn children_by_slot_mut(&mut self, slot: &str) -> Result<Vec<&mut Node>, NodeError> {
        self.slot_mismatch_if_absent(slot)?;
        Ok(self
            .children_mut()
            .filter(|child| child.slot == slot)
            .map(Child::node_mut)
            .collect())
    }

    fn slot_mismatch_if_absent(&self, slot: &str) -> Result<(), NodeError> {
        if self.entries.iter().any(|entry| entry.is_slot(slot)) {
            return Ok(());
        }
        self.slot_mismatch(slot)
    }

    /// All direct children with the given code, in order, regardless of slot.
    pub fn children_by_code(&self, code: i64) -> Vec<&Node> {
        self.children()
            .filter(|child| child.code() == code)
            .map(Child::node)
            .collect()
    }

    /// Mutable variant of [`children_by_code`](Self::children_by_code).
    pub fn children_by_code_mut(&mut self, code: i64) -> Vec<&mut Node> {
        self.children_mut()
            .filter(|child| child.code() == code)
            .map(Child::node_mut)
            .collect()
    }

    /// Visits this node and every descendant depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.node.walk_at(depth + 1, visit);
        }
    }

    /// Depth-first search over the whole subtree (self first, then children in order)
    /// for nodes whose direct attribute `key` equals `value`.
    pub fn find_by_attribute(
        &self,
        key: impl AsPath,
        value: impl Into<Value>,
    ) -> Result<Vec<&Node>, NodeError> {
        let key = key.as_path()?;
        let value = value.into();
        let mut found = Vec::new();
        self.walk(&mut |node, _| {
            if node.matches_attribute(key, &value) {
                found.push(node);
            }
        });
        Ok(found)
    }

    /// The first node, in [`find_by_attribute`](Self::find_by_attribute) order, whose
    /// attribute `key` equals `value`.
    pub fn find_first_by_attribute_mut(
        &mut self,
        key: impl AsPath,
        value: impl Into<Value>,
    ) -> Result<Option<&mut Node>, NodeError> {
        let key = key.as_path()?;
        let value = value.into();
        Ok(self.find_first_mut(&|node| node.matches_attribute(key, &value)))
    }

    /// Depth-first search over the whole subtree for nodes with the given code.
    pub fn find_by_code(&self, code: i64) -> Vec<&Node> {
        let mut found = Vec::new();
        self.walk(&mut |node, _| {
            if node.code == code {
                found.push(node);
            }
        });
        found
    }

    /// The first node in depth-first order with the given code.
    pub fn find_first_by_code_mut(&mut self, code: i64) -> Option<&mut Node> {
        self.find_first_mut(&|node| node.code == code)
    }

    fn find_first_mut(&mut self, pred: &impl Fn(&Node) -> bool) -> Option<&mut Node> {
        if pred(self) {
            return Some(self);
        }
        for child in self.children_mut() {
            if let Some(found) = child.node.find_first_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn matches_attribute(&self, key: &Path, value: &Value) -> bool {
        self.attributes()
            .any(|attr| attr.key == key.as_str() && attr.value() == value)
    }

    /// Index of the first child entry stored under `slot`.
    pub fn position_of_slot(&self, slot: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.is_slot(slot))
    }

    /// Appends a single child after the last entry.
    pub fn push_child(&mut self, slot: impl Into<String>, node: Node) {
        self.entries.push(Entry::Child(Child::new(slot, node)));
    }

    /// Inserts a run of children tagged `(slot, code)`.
    ///
    /// Each node's code is set to `code`. Placement follows `policy`; the relative order
    /// of `nodes` is kept. Returns the entry index of the first inserted child.
    pub fn splice_children(
        &mut self,
        slot: &str,
        code: i64,
        nodes: Vec<Node>,
        policy: SplicePolicy,
    ) -> usize {
        let at = match policy {
            SplicePolicy::BeforeFirstOfSlot => {
                self.position_of_slot(slot).unwrap_or(self.entries.len())
            }
            SplicePolicy::Append => self.entries.len(),
        };

        tracing::debug!(slot, code, count = nodes.len(), at, "splicing children");
        self.insert_run(at, slot, code, nodes);
        at
    }

    fn insert_run(&mut self, at: usize, slot: &str, code: i64, nodes: Vec<Node>) {
        let tail = self.entries.split_off(at);
        self.entries.extend(nodes.into_iter().map(|mut node| {
            node.code = code;
            Entry::Child(Child::new(slot, node))
        }));
        self.entries.extend(tail);
    }

    /// Removes every child stored under `slot` and returns them in order.
    pub fn remove_children(&mut self, slot: &str) -> Vec<Node> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match entry {
                Entry::Child(child) if child.slot == slot => removed.push(child.node),
                other => kept.push(other),
            }
        }
        self.entries = kept;
        removed
    }

    /// Replaces the whole `slot` group with `nodes`.
    ///
    /// With [`SplicePolicy::BeforeFirstOfSlot`] the new run takes the position of the
    /// first removed child. Returns the removed children.
    pub fn replace_children(
        &mut self,
        slot: &str,
        code: i64,
        nodes: Vec<Node>,
        policy: SplicePolicy,
    ) -> Vec<Node> {
        let anchor = self.position_of_slot(slot);
        let removed = self.remove_children(slot);
        let at = match (policy, anchor) {
            (SplicePolicy::BeforeFirstOfSlot, Some(index)) => index,
            _ => self.entries.len(),
        };
        self.insert_run(at, slot, code, nodes);
        removed
    }

    /// Keeps attributes and only the children for which `keep` returns true.
    pub fn retain_children(&mut self, mut keep: impl FnMut(&Child) -> bool) {
        self.entries.retain(|entry| match entry {
            Entry::Child(child) => keep(child),
            Entry::Scalar(_) => true,
        });
    }

    /// `m_id`
    pub fn id(&self) -> Result<Option<i64>, NodeError> {
        self.get_as(ID)
    }

    /// `m_master_id`: the direct structural parent's id
    pub fn master_id(&self) -> Result<Option<i64>, NodeError> {
        self.get_as(MASTER_ID)
    }

    /// `m_owner_id`: a logical owner further up the tree
    pub fn owner_id(&self) -> Result<Option<i64>, NodeError> {
        self.get_as(OWNER_ID)
    }

    pub fn set_id(&mut self, id: i64) -> Result<(), NodeError> {
        self.set(ID, id).map(|_| ())
    }

    pub fn set_master_id(&mut self, id: i64) -> Result<(), NodeError> {
        self.set(MASTER_ID, id).map(|_| ())
    }

    pub fn set_owner_id(&mut self, id: i64) -> Result<(), NodeError> {
        self.set(OWNER_ID, id).map(|_| ())
    }
}

impl fmt::Display for Node {
    /// Renders the node in the seria text format with default options.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::write(self))
    }
}
