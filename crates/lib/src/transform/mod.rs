//! Tree transformation toolkit.
//!
//! Higher-level editing is composed from a few primitives built on the public
//! [`Node`] contract:
//!
//! - [`ChildSelector`] and [`AllowList`] describe which children an operation targets.
//! - [`prune`] keeps every attribute and only the allowed children of a node.
//! - [`first_child`] and [`single_by_attribute`] are lookups that treat "nothing
//!   found" as a broken tree rather than a normal outcome.
//! - [`relink`] gives a chain of nodes fresh identities and rebuilds their
//!   `m_master_id`/`m_owner_id` references top-down.
//!
//! All of them mutate in place. Callers that must leave a source tree untouched work
//! on an explicit `clone()`.

use std::{fmt, str::FromStr};

use tracing::{debug, warn};

use crate::{
    Result,
    id::IdGenerator,
    node::{AsPath, Child, Node, PathBuf, Value},
};

pub mod errors;

pub use errors::TransformError;

/// Matches child entries of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSelector {
    /// Children stored under `slot` with the given code
    SlotCode(String, i64),
    /// Children stored under `slot`, any code
    Slot(String),
    /// Children with the given code, any slot
    Code(i64),
    /// Children whose node has the direct attribute `key` equal to `value`
    Attribute(PathBuf, Value),
}

impl ChildSelector {
    pub fn slot_code(slot: impl Into<String>, code: i64) -> Self {
        ChildSelector::SlotCode(slot.into(), code)
    }

    pub fn slot(slot: impl Into<String>) -> Self {
        ChildSelector::Slot(slot.into())
    }

    pub fn code(code: i64) -> Self {
        ChildSelector::Code(code)
    }

    pub fn attribute(key: impl AsPath, value: impl Into<Value>) -> Result<Self> {
        let key = key.as_path()?.to_path_buf();
        Ok(ChildSelector::Attribute(key, value.into()))
    }

    pub fn matches(&self, child: &Child) -> bool {
        match self {
            ChildSelector::SlotCode(slot, code) => child.slot() == slot && child.code() == *code,
            ChildSelector::Slot(slot) => child.slot() == slot,
            ChildSelector::Code(code) => child.code() == *code,
            ChildSelector::Attribute(key, value) => child.node().matches_attribute(key, value),
        }
    }
}

impl fmt::Display for ChildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildSelector::SlotCode(slot, code) => write!(f, "{slot}:{code}"),
            ChildSelector::Slot(slot) => write!(f, "{slot}"),
            ChildSelector::Code(code) => write!(f, ":{code}"),
            ChildSelector::Attribute(key, value) => write!(f, "{key}={value}"),
        }
    }
}

/// Parses `SLOT`, `SLOT:CODE`, `:CODE` or `KEY=VALUE`.
///
/// ```
/// # use seria::transform::ChildSelector;
/// assert_eq!("m_children:31".parse::<ChildSelector>()?, ChildSelector::slot_code("m_children", 31));
/// assert_eq!(":47".parse::<ChildSelector>()?, ChildSelector::code(47));
/// assert_eq!("m_mesh".parse::<ChildSelector>()?, ChildSelector::slot("m_mesh"));
/// assert!("m_children:x".parse::<ChildSelector>().is_err());
/// # Ok::<(), seria::transform::TransformError>(())
/// ```
impl FromStr for ChildSelector {
    type Err = TransformError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |reason: &str| TransformError::InvalidSelector {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if let Some((key, value)) = input.split_once('=') {
            let key = PathBuf::new(key).map_err(|err| invalid(&err.to_string()))?;
            return Ok(ChildSelector::Attribute(key, Value::parse(value)));
        }

        let (slot, code) = match input.split_once(':') {
            Some((slot, code)) => {
                let code = code
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| invalid("code is not an integer"))?;
                (slot.trim(), Some(code))
            }
            None => (input.trim(), None),
        };

        if slot.chars().any(char::is_whitespace) {
            return Err(invalid("slot names cannot contain whitespace"));
        }

        match (slot.is_empty(), code) {
            (true, None) => Err(invalid("selector is empty")),
            (true, Some(code)) => Ok(ChildSelector::Code(code)),
            (false, None) => Ok(ChildSelector::Slot(slot.to_string())),
            (false, Some(code)) => Ok(ChildSelector::SlotCode(slot.to_string(), code)),
        }
    }
}

/// An ordered set of selectors; a child is allowed if any selector matches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowList {
    selectors: Vec<ChildSelector>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a selector, builder style.
    pub fn with(mut self, selector: ChildSelector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn push(&mut self, selector: ChildSelector) {
        self.selectors.push(selector);
    }

    pub fn allows(&self, child: &Child) -> bool {
        self.selectors.iter().any(|selector| selector.matches(child))
    }

    pub fn selectors(&self) -> &[ChildSelector] {
        &self.selectors
    }
}

impl FromIterator<ChildSelector> for AllowList {
    fn from_iter<I: IntoIterator<Item = ChildSelector>>(iter: I) -> Self {
        Self {
            selectors: iter.into_iter().collect(),
        }
    }
}

/// Keeps all attributes of `node` and only the children the allow list accepts.
///
/// Only direct children are considered; kept children are left as they are, so
/// deeper levels are pruned by calling this again on them. Returns the number of
/// children removed.
pub fn prune(node: &mut Node, allow: &AllowList) -> usize {
    let before = node.len();
    node.retain_children(|child| allow.allows(child));
    let removed = before - node.len();
    debug!(
        classname = node.classname(),
        removed,
        kept = node.children().count(),
        "pruned children"
    );
    removed
}

fn missing(node: &Node, expected: String) -> TransformError {
    TransformError::StructuralAssumptionViolated {
        parent: node.classname().to_string(),
        expected,
    }
}

/// The first direct child matching `selector`.
///
/// Fails with `StructuralAssumptionViolated` when there is none.
pub fn first_child<'a>(node: &'a Node, selector: &ChildSelector) -> Result<&'a Node> {
    node.children()
        .find(|child| selector.matches(child))
        .map(Child::node)
        .ok_or_else(|| missing(node, format!("a child matching '{selector}'")).into())
}

/// Mutable variant of [`first_child`].
pub fn first_child_mut<'a>(node: &'a mut Node, selector: &ChildSelector) -> Result<&'a mut Node> {
    let parent = node.classname().to_string();
    node.children_mut()
        .find(|child| selector.matches(child))
        .map(Child::node_mut)
        .ok_or_else(|| {
            TransformError::StructuralAssumptionViolated {
                parent,
                expected: format!("a child matching '{selector}'"),
            }
            .into()
        })
}

/// The node a lookup expects to be unique within `node`'s subtree.
///
/// Searches depth-first like [`Node::find_by_attribute`]. No match is a
/// `StructuralAssumptionViolated` failure; several matches are logged and the first
/// one is returned.
pub fn single_by_attribute<'a>(
    node: &'a Node,
    key: impl AsPath,
    value: impl Into<Value>,
) -> Result<&'a Node> {
    let key = key.as_path()?;
    let value = value.into();
    let found = node.find_by_attribute(key, &value)?;
    if found.len() > 1 {
        warn!(
            key = key.as_str(),
            %value,
            matches = found.len(),
            "expected a single match, using the first"
        );
    }
    found
        .into_iter()
        .next()
        .ok_or_else(|| missing(node, format!("a node with {key}={value}")).into())
}

/// Mutable variant of [`single_by_attribute`]; returns the first match in search order.
pub fn single_by_attribute_mut<'a>(
    node: &'a mut Node,
    key: impl AsPath,
    value: impl Into<Value>,
) -> Result<&'a mut Node> {
    let key = key.as_path()?;
    let value = value.into();
    let expected = format!("a node with {key}={value}");
    let parent = node.classname().to_string();
    node.find_first_by_attribute_mut(key, value)?.ok_or_else(|| {
        TransformError::StructuralAssumptionViolated { parent, expected }.into()
    })
}

/// Describes an ownership chain to re-link.
///
/// The chain starts at the node passed to [`relink`] and descends one level per
/// selector, always into the first matching child.
#[derive(Debug, Clone, PartialEq)]
pub struct RelinkPlan {
    levels: Vec<ChildSelector>,
    master_id: Option<i64>,
    owner_id: Option<i64>,
    leaf_takes_owner: bool,
}

impl RelinkPlan {
    pub fn new(levels: impl IntoIterator<Item = ChildSelector>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            master_id: None,
            owner_id: None,
            leaf_takes_owner: false,
        }
    }

    /// `m_master_id` for the top of the chain, pointing at its new parent.
    pub fn with_master_id(mut self, id: i64) -> Self {
        self.master_id = Some(id);
        self
    }

    /// Shared owner id threaded through the chain. A fresh one is drawn when unset.
    pub fn with_owner_id(mut self, id: i64) -> Self {
        self.owner_id = Some(id);
        self
    }

    /// Makes the last node of the chain use the shared owner id as its own `m_id`.
    pub fn leaf_takes_owner(mut self, enabled: bool) -> Self {
        self.leaf_takes_owner = enabled;
        self
    }

    pub fn levels(&self) -> &[ChildSelector] {
        &self.levels
    }
}

/// Identifiers assigned by [`relink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relinked {
    /// New `m_id` of every node in the chain, top first
    pub ids: Vec<i64>,
    /// The owner id written to every level below the top
    pub owner_id: i64,
}

/// Re-links an ownership chain top-down.
///
/// The top node gets a fresh `m_id` and, if the plan has one, an `m_master_id`; it
/// gets no `m_owner_id`. Every following level gets a fresh `m_id` (the owner id for
/// the leaf when [`RelinkPlan::leaf_takes_owner`] is set), `m_master_id` set to its
/// parent's new id and `m_owner_id` set to the shared owner id.
///
/// A level without a matching child fails with `StructuralAssumptionViolated`; the
/// levels above it have already been rewritten by then.
pub fn relink(root: &mut Node, plan: &RelinkPlan, ids: &mut impl IdGenerator) -> Result<Relinked> {
    let owner_id = match plan.owner_id {
        Some(id) => id,
        None => ids.next_id(),
    };

    let root_id = ids.next_id();
    root.set_id(root_id)?;
    if let Some(master_id) = plan.master_id {
        root.set_master_id(master_id)?;
    }

    let mut issued = vec![root_id];
    let mut parent_id = root_id;
    let mut current = root;

    for (depth, selector) in plan.levels.iter().enumerate() {
        let is_leaf = depth + 1 == plan.levels.len();
        let node = first_child_mut(current, selector)?;

        let id = if is_leaf && plan.leaf_takes_owner {
            owner_id
        } else {
            ids.next_id()
        };
        node.set_id(id)?;
        node.set_master_id(parent_id)?;
        node.set_owner_id(owner_id)?;

        issued.push(id);
        parent_id = id;
        current = node;
    }

    debug!(
        classname = current.classname(),
        levels = issued.len(),
        owner_id,
        "relinked ownership chain"
    );

    Ok(Relinked {
        ids: issued,
        owner_id,
    })
}
