use std::io;

use thiserror::Error;

/// Token table IO error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IOError {
    /// Error in file IO.
    #[error("error reading or writing token tables")]
    IO(#[from] io::Error),

    /// Parsing error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A column holds values of different types, which cannot be
    /// expressed in the table header.
    #[error("column {column:?} holds values of different types")]
    MixedColumnTypes { column: String },

    /// A string value cannot be represented in the table format.
    #[error("value {value:?} of column {column:?} cannot be written")]
    InvalidValue { column: String, value: String },

    /// A column name cannot be represented in the table header.
    #[error("column name {column:?} cannot be written")]
    InvalidColumnName { column: String },

    /// All fields of a row are blank, so that the row would be read as a
    /// table separator.
    #[error("row {row} only has blank fields")]
    BlankRow { row: usize },
}

/// Token table parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// A column in the header does not have a name.
    #[error("column without a name in header: {header:?}")]
    EmptyColumnName { header: String },

    /// A column name occurs more than once in the header.
    #[error("duplicate column: {column:?}")]
    DuplicateColumn { column: String },

    /// The type of a column is not one of `str`, `int`, or `span`.
    #[error("unknown column type: {value:?}")]
    UnknownColumnType { value: String },

    /// A row does not have the same number of fields as the header.
    #[error("expected {expected} fields, found {found}: {row:?}")]
    ColumnCount {
        expected: usize,
        found: usize,
        row: String,
    },

    /// An integer field could not be parsed as an integer.
    #[error("cannot parse as integer field: {value:?}")]
    ParseIntField { value: String },

    /// A span field could not be parsed as a span.
    #[error("cannot parse as span field: {value:?}")]
    ParseSpanField { value: String },
}
