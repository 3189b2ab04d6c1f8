use thiserror::Error;
use tokgraph::error::GraphError;

/// Error converting a token/feature table into a graph.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum MalformedInputError {
    /// Error constructing the graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The table does not have any rows.
    #[error("token table is empty")]
    EmptyTable,

    /// A row lacks a required column.
    #[error("row {row:?} lacks required column {column:?}")]
    MissingColumn { row: usize, column: String },

    /// A row does not have the same columns as the first row.
    #[error("columns of row {row:?} differ from the first row in column {column:?}")]
    InconsistentColumns { row: usize, column: String },

    /// A link column contains a value that is not a row index.
    #[error("value {value} of link column {column:?} in row {row:?} is not a row index")]
    InvalidLink {
        row: usize,
        column: String,
        value: String,
    },
}

/// Error evaluating a traversal.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum TraversalError {
    /// A vertex step was applied to an element that is not a vertex.
    #[error("{step} step requires a vertex, found: {element}")]
    NotAVertex { step: &'static str, element: String },

    /// A select step was given no labels.
    #[error("select step requires at least one label")]
    EmptySelect,

    /// No element was bound to a label.
    #[error("no element is labeled {label:?}")]
    UnknownLabel { label: String },
}
