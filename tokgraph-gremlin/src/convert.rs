//! Conversion of token/feature tables into traversable graphs.

use std::convert::TryFrom;

use tokgraph::graph::{Link, TokenGraph};
use tokgraph::table::TokenTable;
use tokgraph::value::Value;

use crate::error::MalformedInputError;
use crate::traversal::TraversalSource;

/// Column that is required by default.
pub const TAG_COLUMN: &str = "tag";

/// Link column that is used by default.
pub const HEAD_COLUMN: &str = "head";

/// Convert a token/feature table into a traversal source.
///
/// Uses the default `TokenGraphBuilder` configuration: rows must have
/// a `tag` column and the `head` column (when present) links tokens to
/// their syntactic heads.
pub fn token_features_to_traversal(
    table: &TokenTable,
) -> Result<TraversalSource, MalformedInputError> {
    TokenGraphBuilder::default().build(table)
}

/// Builder of token graphs.
///
/// Every row of a token/feature table becomes a vertex, in row order,
/// so that `v[i]` is the vertex of row `i`. All columns of a row are
/// attached to its vertex as properties.
///
/// *Link columns* contain row indices. For every row, a link column
/// adds an edge from the row's vertex to the vertex of the row that it
/// refers to. The edge is labeled with the column name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenGraphBuilder {
    required_columns: Vec<String>,
    link_columns: Vec<String>,
    drop_self_links: bool,
}

impl Default for TokenGraphBuilder {
    fn default() -> Self {
        TokenGraphBuilder {
            required_columns: vec![TAG_COLUMN.to_owned()],
            link_columns: vec![HEAD_COLUMN.to_owned()],
            drop_self_links: true,
        }
    }
}

impl TokenGraphBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        TokenGraphBuilder::default()
    }

    /// Set the columns that every row must have.
    ///
    /// Default: `tag`.
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the columns that link rows to other rows.
    ///
    /// Link columns that do not occur in a table are ignored. Default:
    /// `head`.
    pub fn link_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Drop links from a row to itself.
    ///
    /// Default: `true`, since dependency parsers typically mark the
    /// root of a sentence as its own head.
    pub fn drop_self_links(mut self, drop_self_links: bool) -> Self {
        self.drop_self_links = drop_self_links;
        self
    }

    /// Build a traversal source for a token/feature table.
    pub fn build(&self, table: &TokenTable) -> Result<TraversalSource, MalformedInputError> {
        self.build_graph(table).map(TraversalSource::new)
    }

    /// Build the graph for a token/feature table.
    pub fn build_graph(&self, table: &TokenTable) -> Result<TokenGraph, MalformedInputError> {
        self.check_columns(table)?;

        let mut graph: TokenGraph = table.iter().cloned().collect();

        // Rows have the same columns, so the first row tells which link
        // columns are present.
        let link_columns = self
            .link_columns
            .iter()
            .filter(|column| table[0].contains_key(column.as_str()));

        for column in link_columns {
            for (row, target) in table.column(column).enumerate() {
                let target = match target {
                    Some(Value::Int(target)) => usize::try_from(*target).ok(),
                    _ => None,
                }
                .ok_or_else(|| MalformedInputError::InvalidLink {
                    row,
                    column: column.clone(),
                    value: target.map(ToString::to_string).unwrap_or_default(),
                })?;

                if self.drop_self_links && target == row {
                    continue;
                }

                graph.add_link(Link::new(row, column.as_str(), target))?;
            }
        }

        tracing::debug!(
            vertices = graph.vertex_count(),
            links = graph.link_count(),
            "converted token table to graph"
        );

        Ok(graph)
    }

    fn check_columns(&self, table: &TokenTable) -> Result<(), MalformedInputError> {
        let first = table.rows().first().ok_or(MalformedInputError::EmptyTable)?;

        for (idx, row) in table.iter().enumerate() {
            if let Some(column) = self
                .required_columns
                .iter()
                .find(|column| !row.contains_key(column.as_str()))
            {
                return Err(MalformedInputError::MissingColumn {
                    row: idx,
                    column: column.clone(),
                });
            }

            if let Some(column) = first
                .keys()
                .filter(|column| !row.contains_key(column.as_str()))
                .chain(row.keys().filter(|column| !first.contains_key(column.as_str())))
                .next()
            {
                return Err(MalformedInputError::InconsistentColumns {
                    row: idx,
                    column: column.clone(),
                });
            }
        }

        Ok(())
    }
}
