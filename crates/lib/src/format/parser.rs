//! Recursive-descent reader for the seria text format.
//!
//! The reader walks the input once, attributing every byte to the node or entry it
//! belongs to so the writer can reproduce an unmodified document exactly.

use crate::node::{Attribute, Child, Entry, Layout, Node, RawHeader, Scalar, path::validate_path};

use super::errors::FormatError;

/// Blocks nested deeper than this are rejected instead of exhausting the stack.
const MAX_DEPTH: usize = 512;

const BOM: char = '\u{feff}';

pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

struct Header<'a> {
    text: &'a str,
    slot: Option<&'a str>,
    classname: &'a str,
    code: i64,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Parses a complete document into its root node.
    pub(crate) fn parse_document(mut self) -> Result<Node, FormatError> {
        let mut before = String::new();
        if self.rest().starts_with(BOM) {
            before.push(BOM);
            self.pos += BOM.len_utf8();
        }
        before.push_str(self.take_whitespace());

        if self.at_end() {
            return Err(self.error("document is empty"));
        }

        let header = self.header(false)?;
        let mut root = self.block(header, 0)?;
        root.layout.before = Some(before);

        let after = self.take_whitespace();
        if !self.at_end() {
            return Err(self.error("unexpected content after the root node"));
        }
        root.layout.after = Some(after.to_string());

        Ok(root)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn take_whitespace(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !matches!(c, ' ' | '\t' | '\r' | '\n'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// The current line up to (not including) its terminator.
    fn line(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..end];
        if end < rest.len() {
            line.strip_suffix('\r').unwrap_or(line)
        } else {
            line
        }
    }

    /// Reads a node header at the current position, leaving the cursor before the
    /// whitespace that precedes `{`.
    fn header(&mut self, child: bool) -> Result<Header<'a>, FormatError> {
        let line = self.line();
        let end = line.find('{').unwrap_or(line.len());
        let text = line[..end].trim_end();

        if text.contains('=') {
            return Err(self.error("expected a node header, found an attribute"));
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let (slot, classname, code) = match (child, tokens.as_slice()) {
            (false, [classname, code]) => (None, *classname, *code),
            (true, [slot, classname, code]) => (Some(*slot), *classname, *code),
            (false, _) => {
                return Err(self.error("root header must be '<classname> <code>'"));
            }
            (true, _) => {
                return Err(self.error("child header must be '<slot> <classname> <code>'"));
            }
        };

        let code = code
            .parse::<i64>()
            .map_err(|_| self.error(&format!("invalid node code '{code}'")))?;

        self.pos += text.len();
        Ok(Header {
            text,
            slot,
            classname,
            code,
        })
    }

    /// Parses `gap { entries gap }` following a header.
    fn block(&mut self, header: Header<'a>, depth: usize) -> Result<Node, FormatError> {
        if depth > MAX_DEPTH {
            return Err(self.error("blocks are nested too deeply"));
        }

        let open = self.take_whitespace();
        if !self.rest().starts_with('{') {
            return Err(self.error(&format!(
                "expected '{{' to open the body of '{}'",
                header.classname
            )));
        }
        let opened_at = self.pos;
        self.pos += 1;

        let mut entries = Vec::new();
        let close = loop {
            let lead = self.take_whitespace();

            if self.at_end() {
                self.pos = opened_at;
                return Err(self.error(&format!(
                    "block of '{}' is never closed",
                    header.classname
                )));
            }

            if self.rest().starts_with('}') {
                self.pos += 1;
                break lead;
            }

            if !lead.contains('\n') {
                return Err(self.error("expected a line break before the next entry"));
            }

            let line = self.line();
            if line.contains('=') {
                entries.push(Entry::Scalar(self.attribute(line, lead)?));
            } else {
                let child_header = self.header(true)?;
                let slot = child_header.slot.unwrap_or_default().to_string();
                let mut node = self.block(child_header, depth + 1)?;
                node.layout.before = Some(lead.to_string());
                entries.push(Entry::Child(Child::new(slot, node)));
            }
        };

        tracing::trace!(
            classname = header.classname,
            code = header.code,
            entries = entries.len(),
            "parsed block"
        );

        let layout = Layout {
            before: None,
            header: Some(RawHeader {
                text: header.text.to_string(),
                slot: header.slot.map(str::to_string),
                classname: header.classname.to_string(),
                code: header.code,
            }),
            open: Some(open.to_string()),
            close: Some(close.to_string()),
            after: None,
        };

        Ok(Node::from_parts(
            header.classname.to_string(),
            header.code,
            entries,
            layout,
        ))
    }

    fn attribute(&mut self, line: &'a str, lead: &'a str) -> Result<Attribute, FormatError> {
        let eq = line.find('=').unwrap_or(line.len());
        let key = &line[..eq];

        if key.is_empty() {
            return Err(self.error("attribute key is empty"));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(self.error(&format!("attribute key '{key}' contains whitespace")));
        }
        // keys must stay addressable by path
        if let Err(err) = validate_path(key) {
            return Err(self.error(&format!("attribute key is not a valid path: {err}")));
        }

        let raw = &line[eq + 1..];
        self.pos += line.len();
        Ok(Attribute::parsed(
            key.to_string(),
            Scalar::from_raw(raw),
            lead.to_string(),
        ))
    }

    fn error(&self, reason: &str) -> FormatError {
        let consumed = &self.src[..self.pos.min(self.src.len())];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        FormatError::Malformed {
            line,
            column,
            reason: reason.to_string(),
        }
    }
}
