//! Token/feature tables.

use std::collections::{BTreeMap, BTreeSet};
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut, Index};
use std::slice;

use crate::value::{Span, Value};

/// A builder for `Row`s.
///
/// Provides a fluent interface for attaching features to a token row.
#[derive(Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    /// Create a builder for a row without features.
    pub fn new() -> RowBuilder {
        RowBuilder::default()
    }

    /// Set a feature of any value type.
    pub fn feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> RowBuilder {
        self.row.insert(name.into(), value.into());
        self
    }

    /// Set a string feature.
    pub fn str(self, name: impl Into<String>, value: impl Into<String>) -> RowBuilder {
        self.feature(name, Value::Str(value.into()))
    }

    /// Set an integer feature.
    pub fn int(self, name: impl Into<String>, value: i64) -> RowBuilder {
        self.feature(name, Value::Int(value))
    }

    /// Set a span feature.
    pub fn span(self, name: impl Into<String>, begin: usize, end: usize) -> RowBuilder {
        self.feature(name, Value::Span(Span::new(begin, end)))
    }
}

impl From<RowBuilder> for Row {
    fn from(builder: RowBuilder) -> Self {
        builder.row
    }
}

/// The features of a single token.
///
/// A row maps feature (column) names to values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row {
    inner: BTreeMap<String, Value>,
}

impl Row {
    /// Construct a row without features.
    pub fn new() -> Self {
        Row::default()
    }

    /// Unwrap the contained feature map.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.inner
    }
}

impl Deref for Row {
    type Target = BTreeMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl From<BTreeMap<String, Value>> for Row {
    fn from(feature_map: BTreeMap<String, Value>) -> Self {
        Row { inner: feature_map }
    }
}

impl<S, V> FromIterator<(S, V)> for Row
where
    S: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
    {
        let features = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Row { inner: features }
    }
}

/// A table of tokens and their features.
///
/// Rows are stored in token order. The index of a row is the identity
/// of the vertex that is created for it in a token graph.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenTable {
    rows: Vec<Row>,
}

impl TokenTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        TokenTable::default()
    }

    /// Append a row.
    ///
    /// Returns the index of the row.
    pub fn push(&mut self, row: impl Into<Row>) -> usize {
        self.rows.push(row.into());
        self.rows.len() - 1
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> slice::Iter<Row> {
        self.rows.iter()
    }

    /// Get the names of all columns that occur in at least one row.
    pub fn columns(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.keys())
            .map(String::as_str)
            .collect()
    }

    /// Get the values of a column in row order.
    ///
    /// Rows that lack the column yield `None`.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}

impl Index<usize> for TokenTable {
    type Output = Row;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.rows[idx]
    }
}

impl From<Vec<Row>> for TokenTable {
    fn from(rows: Vec<Row>) -> Self {
        TokenTable { rows }
    }
}

impl FromIterator<Row> for TokenTable {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Row>,
    {
        TokenTable {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TokenTable {
    type Item = &'a Row;
    type IntoIter = slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TokenTable {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::iter::FromIterator;

    use maplit::{btreemap, btreeset};

    use super::{Row, RowBuilder, TokenTable};
    use crate::tests::ITEM_TABLE;
    use crate::value::{Span, Value};

    #[test]
    fn row_from_iter() {
        let feature_map = btreemap! {
            "tag".to_string() => Value::from("NNP"),
            "head".to_string() => Value::from(1),
        };

        assert_eq!(feature_map, *Row::from_iter(feature_map.clone()));
    }

    #[test]
    fn row_builder() {
        let row: Row = RowBuilder::new()
            .str("text", "Item")
            .span("span", 0, 4)
            .int("head", 1)
            .into();

        assert_eq!(row.get("text"), Some(&Value::from("Item")));
        assert_eq!(row.get("span"), Some(&Value::from(Span::new(0, 4))));
        assert_eq!(row.get("head"), Some(&Value::from(1)));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn push_returns_row_index() {
        let mut table = TokenTable::new();
        assert!(table.is_empty());
        assert_eq!(table.push(RowBuilder::new().str("tag", "NN")), 0);
        assert_eq!(table.push(RowBuilder::new().str("tag", "NN")), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn columns() {
        assert_eq!(
            ITEM_TABLE.columns(),
            btreeset! {"dep", "head", "id", "lemma", "pos", "span", "tag", "text"}
        );
    }

    #[test]
    fn column_values_are_in_row_order() {
        let tags = ITEM_TABLE
            .column("tag")
            .map(|v| v.and_then(Value::as_str).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(tags, vec!["NNP", "VBZ", "IN", "XX", "$", "CD", "CC", "NN"]);

        assert!(ITEM_TABLE.column("nonexistent").all(|v| v.is_none()));
    }
}
