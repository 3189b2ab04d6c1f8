//! Feature values.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// A character span `[begin, end)` in the source text.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Span {
    begin: usize,
    end: usize,
}

impl Span {
    /// Construct a span.
    ///
    /// # Panics
    ///
    /// Panics when `begin` is larger than `end`.
    pub fn new(begin: usize, end: usize) -> Self {
        assert!(
            begin <= end,
            "span begin {} is larger than span end {}",
            begin,
            end
        );
        Span { begin, end }
    }

    /// Get the (inclusive) begin offset.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Get the (exclusive) end offset.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Get the text covered by this span.
    ///
    /// Offsets are character offsets. Returns `None` when the span
    /// does not fit in `text`.
    pub fn covered_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut indices = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()));
        let begin = indices.nth(self.begin)?;
        let end = if self.is_empty() {
            begin
        } else {
            indices.nth(self.len() - 1)?
        };
        text.get(begin..end)
    }
}

impl Display for Span {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "[{}, {})", self.begin, self.end)
    }
}

/// Value of a token feature.
///
/// Equality is type-sensitive: the string `"100"` is not equal to the
/// integer `100`. Values can only be ordered against values of the
/// same variant.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Span(Span),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_span(&self) -> Option<Span> {
        match self {
            Value::Span(span) => Some(*span),
            _ => None,
        }
    }

    /// Name of the value type, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Span(_) => "span",
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Span(a), Value::Span(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Value::Str(s) => write!(fmt, "{:?}", s),
            Value::Int(i) => write!(fmt, "{}", i),
            Value::Span(span) => write!(fmt, "{}", span),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<Span> for Value {
    fn from(span: Span) -> Self {
        Value::Span(span)
    }
}
