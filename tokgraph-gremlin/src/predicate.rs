//! Predicates on property values.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use tokgraph::value::{Span, Value};

/// A predicate on a property value.
///
/// Predicates are used by the `has` step of a traversal. Every value
/// type converts into an equality predicate, so `has("tag", "NNP")`
/// and `has("tag", P::eq("NNP"))` are equivalent.
///
/// Comparisons are type-sensitive: a predicate on a string never
/// matches an integer and vice versa. Text predicates only match
/// string values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum P {
    Eq(Value),
    Neq(Value),
    Lt(Value),
    Lte(Value),
    Gt(Value),
    Gte(Value),

    /// `lower <= value < upper`
    Between(Value, Value),

    /// `lower < value < upper`
    Inside(Value, Value),

    /// `value < lower || value > upper`
    Outside(Value, Value),

    Within(Vec<Value>),
    Without(Vec<Value>),

    StartingWith(String),
    NotStartingWith(String),
    EndingWith(String),
    NotEndingWith(String),
    Containing(String),
    NotContaining(String),

    And(Box<P>, Box<P>),
    Or(Box<P>, Box<P>),
}

impl P {
    pub fn eq(value: impl Into<Value>) -> Self {
        P::Eq(value.into())
    }

    pub fn neq(value: impl Into<Value>) -> Self {
        P::Neq(value.into())
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        P::Lt(value.into())
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        P::Lte(value.into())
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        P::Gt(value.into())
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        P::Gte(value.into())
    }

    pub fn between(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        P::Between(lower.into(), upper.into())
    }

    pub fn inside(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        P::Inside(lower.into(), upper.into())
    }

    pub fn outside(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        P::Outside(lower.into(), upper.into())
    }

    pub fn within<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        P::Within(values.into_iter().map(Into::into).collect())
    }

    pub fn without<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        P::Without(values.into_iter().map(Into::into).collect())
    }

    pub fn starting_with(prefix: impl Into<String>) -> Self {
        P::StartingWith(prefix.into())
    }

    pub fn not_starting_with(prefix: impl Into<String>) -> Self {
        P::NotStartingWith(prefix.into())
    }

    pub fn ending_with(suffix: impl Into<String>) -> Self {
        P::EndingWith(suffix.into())
    }

    pub fn not_ending_with(suffix: impl Into<String>) -> Self {
        P::NotEndingWith(suffix.into())
    }

    pub fn containing(infix: impl Into<String>) -> Self {
        P::Containing(infix.into())
    }

    pub fn not_containing(infix: impl Into<String>) -> Self {
        P::NotContaining(infix.into())
    }

    /// Conjunction of this predicate and `other`.
    pub fn and(self, other: P) -> Self {
        P::And(Box::new(self), Box::new(other))
    }

    /// Disjunction of this predicate and `other`.
    pub fn or(self, other: P) -> Self {
        P::Or(Box::new(self), Box::new(other))
    }

    /// Get the negation of this predicate.
    ///
    /// Negation preserves type-sensitivity: the negation of `lt(5)`
    /// is `gte(5)`, which still only matches integers.
    pub fn negate(self) -> Self {
        match self {
            P::Eq(v) => P::Neq(v),
            P::Neq(v) => P::Eq(v),
            P::Lt(v) => P::Gte(v),
            P::Lte(v) => P::Gt(v),
            P::Gt(v) => P::Lte(v),
            P::Gte(v) => P::Lt(v),
            P::Between(lower, upper) => P::Lt(lower).or(P::Gte(upper)),
            P::Inside(lower, upper) => P::Lte(lower).or(P::Gte(upper)),
            P::Outside(lower, upper) => P::Between(lower, upper.clone()).or(P::Eq(upper)),
            P::Within(vs) => P::Without(vs),
            P::Without(vs) => P::Within(vs),
            P::StartingWith(s) => P::NotStartingWith(s),
            P::NotStartingWith(s) => P::StartingWith(s),
            P::EndingWith(s) => P::NotEndingWith(s),
            P::NotEndingWith(s) => P::EndingWith(s),
            P::Containing(s) => P::NotContaining(s),
            P::NotContaining(s) => P::Containing(s),
            P::And(a, b) => a.negate().or(b.negate()),
            P::Or(a, b) => a.negate().and(b.negate()),
        }
    }

    /// Test a value against this predicate.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            P::Eq(v) => value == v,
            P::Neq(v) => value != v,
            P::Lt(v) => value < v,
            P::Lte(v) => value <= v,
            P::Gt(v) => value > v,
            P::Gte(v) => value >= v,
            P::Between(lower, upper) => value >= lower && value < upper,
            P::Inside(lower, upper) => value > lower && value < upper,
            P::Outside(lower, upper) => value < lower || value > upper,
            P::Within(vs) => vs.contains(value),
            P::Without(vs) => !vs.contains(value),
            P::StartingWith(s) => test_text(value, |text| text.starts_with(s.as_str())),
            P::NotStartingWith(s) => test_text(value, |text| !text.starts_with(s.as_str())),
            P::EndingWith(s) => test_text(value, |text| text.ends_with(s.as_str())),
            P::NotEndingWith(s) => test_text(value, |text| !text.ends_with(s.as_str())),
            P::Containing(s) => test_text(value, |text| text.contains(s.as_str())),
            P::NotContaining(s) => test_text(value, |text| !text.contains(s.as_str())),
            P::And(a, b) => a.test(value) && b.test(value),
            P::Or(a, b) => a.test(value) || b.test(value),
        }
    }
}

fn test_text(value: &Value, pred: impl FnOnce(&str) -> bool) -> bool {
    value.as_str().map(pred).unwrap_or(false)
}

impl Display for P {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            P::Eq(v) => write!(f, "eq({})", v),
            P::Neq(v) => write!(f, "neq({})", v),
            P::Lt(v) => write!(f, "lt({})", v),
            P::Lte(v) => write!(f, "lte({})", v),
            P::Gt(v) => write!(f, "gt({})", v),
            P::Gte(v) => write!(f, "gte({})", v),
            P::Between(lower, upper) => write!(f, "between({},{})", lower, upper),
            P::Inside(lower, upper) => write!(f, "inside({},{})", lower, upper),
            P::Outside(lower, upper) => write!(f, "outside({},{})", lower, upper),
            P::Within(vs) => write!(f, "within([{}])", vs.iter().join(",")),
            P::Without(vs) => write!(f, "without([{}])", vs.iter().join(",")),
            P::StartingWith(s) => write!(f, "startingWith({:?})", s),
            P::NotStartingWith(s) => write!(f, "notStartingWith({:?})", s),
            P::EndingWith(s) => write!(f, "endingWith({:?})", s),
            P::NotEndingWith(s) => write!(f, "notEndingWith({:?})", s),
            P::Containing(s) => write!(f, "containing({:?})", s),
            P::NotContaining(s) => write!(f, "notContaining({:?})", s),
            P::And(a, b) => write!(f, "and({},{})", a, b),
            P::Or(a, b) => write!(f, "or({},{})", a, b),
        }
    }
}

impl From<Value> for P {
    fn from(value: Value) -> Self {
        P::Eq(value)
    }
}

impl From<&str> for P {
    fn from(value: &str) -> Self {
        P::eq(value)
    }
}

impl From<String> for P {
    fn from(value: String) -> Self {
        P::eq(value)
    }
}

impl From<i64> for P {
    fn from(value: i64) -> Self {
        P::eq(value)
    }
}

impl From<i32> for P {
    fn from(value: i32) -> Self {
        P::eq(value)
    }
}

impl From<Span> for P {
    fn from(value: Span) -> Self {
        P::eq(value)
    }
}
