//! Serializer for the seria text format.
//!
//! Everything retained by the parser is re-emitted verbatim as long as it still
//! describes the tree. Anything created or changed since parsing is laid out
//! canonically according to [`FormatOptions`].

use crate::node::{Child, Entry, Layout, Node};

/// Line terminator used for canonical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Canonical layout settings.
///
/// These only affect entries and nodes without retained source layout: a document that
/// is parsed and written back unchanged is identical whatever the options.
///
/// # Examples
///
/// ```
/// use seria::format::{FormatOptions, LineEnding, write_with};
/// use seria::node::Node;
///
/// let mut node = Node::new("Intel", 515);
/// node.set("m_age", 0)?;
///
/// let options = FormatOptions {
///     indent: "  ".to_string(),
///     line_ending: LineEnding::CrLf,
/// };
/// assert_eq!(write_with(&node, &options), "Intel 515\r\n{\r\n  m_age=0\r\n}\r\n");
/// # Ok::<(), seria::node::NodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// One level of indentation
    pub indent: String,
    pub line_ending: LineEnding,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            line_ending: LineEnding::Lf,
        }
    }
}

/// Serializes `node` as a document root using default [`FormatOptions`].
pub fn write(node: &Node) -> String {
    write_with(node, &FormatOptions::default())
}

/// Serializes `node` as a document root.
pub fn write_with(node: &Node, options: &FormatOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        options,
    };
    writer.root(node);
    tracing::trace!(
        classname = node.classname(),
        bytes = writer.out.len(),
        "serialized node"
    );
    writer.out
}

struct Writer<'a> {
    out: String,
    options: &'a FormatOptions,
}

/// Whitespace that can separate two entries: it must start a new line.
fn is_entry_lead(text: &str) -> bool {
    text.contains('\n') && text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

impl Writer<'_> {
    fn root(&mut self, node: &Node) {
        let layout = &node.layout;
        let was_root = layout.header.as_ref().is_some_and(|h| h.slot.is_none());

        match layout.before.as_deref() {
            Some(before) if was_root => self.out.push_str(before),
            _ => {}
        }

        self.header(node, None);
        self.block(node, 0);

        match layout.after.as_deref() {
            Some(after) if was_root => self.out.push_str(after),
            _ => self.out.push_str(self.options.line_ending.as_str()),
        }
    }

    fn newline(&mut self, depth: usize) {
        self.out.push_str(self.options.line_ending.as_str());
        for _ in 0..depth {
            self.out.push_str(&self.options.indent);
        }
    }

    fn header(&mut self, node: &Node, slot: Option<&str>) {
        if let Some(raw) = &node.layout.header {
            if raw.slot.as_deref() == slot
                && raw.classname == node.classname()
                && raw.code == node.code()
            {
                self.out.push_str(&raw.text);
                return;
            }
        }

        if let Some(slot) = slot {
            self.out.push_str(slot);
            self.out.push(' ');
        }
        self.out.push_str(node.classname());
        self.out.push(' ');
        self.out.push_str(&node.code().to_string());
    }

    fn block(&mut self, node: &Node, depth: usize) {
        let Layout { open, close, .. } = &node.layout;

        match open.as_deref() {
            Some(open) if is_whitespace(open) => self.out.push_str(open),
            _ => self.newline(depth),
        }
        self.out.push('{');

        for entry in node.entries() {
            match entry {
                Entry::Scalar(attr) => {
                    self.lead(attr.lead.as_deref(), depth + 1);
                    self.out.push_str(attr.key());
                    self.out.push('=');
                    self.out.push_str(&attr.scalar().text());
                }
                Entry::Child(child) => self.child(child, depth + 1),
            }
        }

        // `}` directly after an attribute would become part of its value
        let after_attribute = matches!(node.entries().last(), Some(Entry::Scalar(_)));
        match close.as_deref() {
            Some(close) if is_entry_lead(close) => self.out.push_str(close),
            Some(close) if !after_attribute && is_whitespace(close) => self.out.push_str(close),
            _ => self.newline(depth),
        }
        self.out.push('}');
    }

    fn child(&mut self, child: &Child, depth: usize) {
        let node = child.node();
        self.lead(node.layout.before.as_deref(), depth);
        self.header(node, Some(child.slot()));
        self.block(node, depth);
    }

    fn lead(&mut self, retained: Option<&str>, depth: usize) {
        match retained {
            Some(lead) if is_entry_lead(lead) => self.out.push_str(lead),
            _ => self.newline(depth),
        }
    }
}
