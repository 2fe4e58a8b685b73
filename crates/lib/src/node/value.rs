//! Scalar values stored in node attributes.
//!
//! This module provides the [`Value`] enum for the typed content of an attribute and
//! the [`Scalar`] wrapper that keeps the exact source text a value was parsed from.
//! Re-emitting an untouched [`Scalar`] reproduces that text byte for byte; replacing the
//! value drops it and the writer falls back to [`Value::canonical`].
//!
//! Classification of raw text never fails. Anything that is not recognisably a
//! boolean or a number is a string.

use std::{borrow::Cow, fmt};

use serde::Serialize;

use super::errors::NodeError;

/// Typed content of an attribute.
///
/// # Direct Comparisons
///
/// `Value` implements `PartialEq` with primitive types for ergonomic comparisons:
///
/// ```
/// # use seria::node::Value;
/// assert!(Value::Str("COMBRIDGE".to_string()) == "COMBRIDGE");
/// assert!(Value::Int(47) == 47);
/// assert!(Value::Bool(true) == true);
///
/// // Integers and floats compare numerically
/// assert_eq!(Value::Int(2), Value::Float(2.0));
/// assert!(!(Value::Int(2) == "2"));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text value
    Str(String),
}

impl Value {
    /// Classifies a piece of attribute text.
    ///
    /// Surrounding whitespace is ignored. `true`/`false` in any case become booleans,
    /// integral numerals become integers (or floats when they overflow `i64`), decimal
    /// numerals with a fraction or exponent become floats, double-quoted text is
    /// unescaped, and everything else is kept as a string.
    ///
    /// ```
    /// # use seria::node::Value;
    /// assert_eq!(Value::parse("TRUE"), Value::Bool(true));
    /// assert_eq!(Value::parse("007"), Value::Int(7));
    /// assert_eq!(Value::parse("-1.5e3"), Value::Float(-1500.0));
    /// assert_eq!(Value::parse("PROFILE@1"), Value::Str("PROFILE@1".to_string()));
    /// ```
    pub fn parse(text: &str) -> Value {
        let text = text.trim();

        if text.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }

        match classify_number(text) {
            Some(NumberShape::Integral) => {
                if let Ok(n) = text.parse::<i64>() {
                    return Value::Int(n);
                }
                if let Ok(f) = text.parse::<f64>() {
                    return Value::Float(f);
                }
            }
            Some(NumberShape::Decimal) => {
                if let Ok(f) = text.parse::<f64>() {
                    return Value::Float(f);
                }
            }
            None => {}
        }

        if let Some(unquoted) = unquote(text) {
            return Value::Str(unquoted);
        }

        Value::Str(text.to_string())
    }

    /// Renders the value in the canonical textual form used for new or modified entries.
    ///
    /// The output always classifies back to an equal value, except for strings that
    /// look like numbers or booleans: those are written bare, as the game expects.
    pub fn canonical(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => {
                if needs_quotes(s) {
                    quote(s)
                } else {
                    s.clone()
                }
            }
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

enum NumberShape {
    Integral,
    Decimal,
}

/// Recognises `[+-]digits` and `[+-](digits.digits*|.digits)([eE][+-]digits)?`.
fn classify_number(text: &str) -> Option<NumberShape> {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    let mut has_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        has_dot = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    let mut has_exp = false;
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        has_exp = true;
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }

    if has_dot || has_exp {
        Some(NumberShape::Decimal)
    } else {
        Some(NumberShape::Integral)
    }
}

fn format_float(f: f64) -> String {
    // Debug keeps a fractional part on integral values and switches to exponent
    // notation for very large or very small magnitudes.
    format!("{f:?}")
}

fn needs_quotes(s: &str) -> bool {
    s.trim() != s || s.contains(['\n', '\r']) || s.starts_with('"')
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn unquote(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// An attribute value together with the text it was read from.
///
/// The retained text is what makes untouched entries round-trip exactly: it
/// preserves leading zeros, float spelling, boolean capitalisation and trailing
/// whitespace that the typed [`Value`] cannot express.
///
/// Scalars compare by value; the retained text does not take part.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Scalar {
    value: Value,
    #[serde(skip)]
    raw: Option<String>,
}

impl Scalar {
    /// Creates a scalar with no retained text.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            raw: None,
        }
    }

    /// Classifies `raw` and keeps it for exact re-emission.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            value: Value::parse(&raw),
            raw: Some(raw),
        }
    }

    /// The typed value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The retained source text, if the value is unmodified since parsing
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Replaces the value, discarding the retained text. Returns the previous value.
    pub fn replace(&mut self, value: Value) -> Value {
        self.raw = None;
        std::mem::replace(&mut self.value, value)
    }

    /// The text the writer emits for this scalar.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.raw {
            Some(raw) => Cow::Borrowed(raw),
            None => Cow::Owned(self.value.canonical()),
        }
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

fn mismatch(expected: &str, value: &Value) -> NodeError {
    NodeError::TypeMismatch {
        path: "value".to_string(),
        expected: expected.to_string(),
        found: value.type_name().to_string(),
    }
}

// TryFrom implementations for typed extraction
impl TryFrom<&Value> for i64 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl TryFrom<&Value> for bool {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = NodeError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_str().ok_or_else(|| mismatch("str", value))
    }
}

impl TryFrom<&Value> for String {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("str", value))
    }
}

// PartialEq implementations for comparing Value with other types
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::Str(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        *self == Value::Int(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        *self == Value::Int(*other as i64)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        *self == Value::Float(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}
