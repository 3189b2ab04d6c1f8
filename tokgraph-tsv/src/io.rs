//! Token table readers and writers.
//!
//! Tables are stored in a tab-separated format. The first line of a
//! table is a header that declares its columns. A column declaration is
//! a name, optionally followed by a colon and the value type (`str`,
//! `int`, or `span`). Columns without a type are string columns. Every
//! following line is a token. Spans are written as `begin..end` and `_`
//! marks an absent value. Tables are separated by a blank line. Lines
//! starting with `#` before the header of a table are comments:
//!
//! ```text
//! # Item's for < $100 & change
//! text	span:span	tag	head:int
//! Item	0..4	NNP	1
//! 's	4..6	VBZ	1
//! ```
//!
//! String values cannot contain tabs or line breaks, and cannot be `_`.
//! Column names additionally cannot contain `:` or start with `#`. The
//! writer rejects tables that violate these restrictions.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::str::FromStr;

use itertools::Itertools;
use tokgraph::table::{Row, TokenTable};
use tokgraph::value::{Span, Value};

use crate::error::{IOError, ParseError};

pub const EMPTY_FIELD: &str = "_";

const SPAN_SEPARATOR: &str = "..";

/// Value type of a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnType {
    Str,
    Int,
    Span,
}

impl ColumnType {
    fn of(value: &Value) -> Self {
        match value {
            Value::Str(_) => ColumnType::Str,
            Value::Int(_) => ColumnType::Int,
            Value::Span(_) => ColumnType::Span,
        }
    }
}

impl FromStr for ColumnType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(ColumnType::Str),
            "int" => Ok(ColumnType::Int),
            "span" => Ok(ColumnType::Span),
            _ => Err(ParseError::UnknownColumnType {
                value: s.to_owned(),
            }),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            ColumnType::Str => write!(f, "str"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Span => write!(f, "span"),
        }
    }
}

/// Column declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Column {
    name: String,
    column_type: ColumnType,
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self.column_type {
            ColumnType::Str => write!(f, "{}", self.name),
            column_type => write!(f, "{}:{}", self.name, column_type),
        }
    }
}

/// A trait for objects that can read `TokenTable`s.
pub trait ReadTable {
    /// Read a `TokenTable` from this object.
    ///
    /// # Errors
    ///
    /// A call to `read_table` may generate an error to indicate that
    /// the operation could not be completed.
    fn read_table(&mut self) -> Result<Option<TokenTable>, IOError>;

    /// Get an iterator over the tables in this reader.
    fn tables(self) -> Tables<Self>
    where
        Self: Sized,
    {
        Tables { reader: self }
    }
}

/// A reader for token tables.
pub struct Reader<R> {
    read: R,
}

impl<R: io::BufRead> Reader<R> {
    /// Construct a new reader from an object that implements the
    /// `io::BufRead` trait.
    pub fn new(read: R) -> Reader<R> {
        Reader { read }
    }
}

impl<R: io::BufRead> IntoIterator for Reader<R> {
    type Item = Result<TokenTable, IOError>;
    type IntoIter = Tables<Reader<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables()
    }
}

impl<R: io::BufRead> ReadTable for Reader<R> {
    fn read_table(&mut self) -> Result<Option<TokenTable>, IOError> {
        let mut line = String::new();
        let mut columns = None;
        let mut table = TokenTable::new();

        loop {
            line.clear();

            // End of reader.
            if self.read.read_line(&mut line)? == 0 {
                return Ok(columns.map(|_| table));
            }

            let line = line.trim_end_matches(&['\n', '\r'][..]);

            // The blank line is a table separator. Multiple blank lines
            // are accepted as a single separator.
            if line.trim().is_empty() {
                if columns.is_none() {
                    continue;
                }

                return Ok(Some(table));
            }

            if columns.is_none() {
                if !line.starts_with('#') {
                    columns = Some(parse_header(line)?);
                }

                continue;
            }

            if let Some(columns) = &columns {
                table.push(parse_row(columns, line)?);
            }
        }
    }
}

/// An iterator over the tables in a `Reader`.
pub struct Tables<R>
where
    R: ReadTable,
{
    reader: R,
}

impl<R> Iterator for Tables<R>
where
    R: ReadTable,
{
    type Item = Result<TokenTable, IOError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_table().transpose()
    }
}

fn parse_header(header: &str) -> Result<Vec<Column>, ParseError> {
    let mut names = HashSet::new();

    header
        .split('\t')
        .map(|declaration| {
            let (name, column_type) = match declaration.split_once(':') {
                Some((name, column_type)) => (name, column_type.parse()?),
                None => (declaration, ColumnType::Str),
            };

            if name.is_empty() {
                return Err(ParseError::EmptyColumnName {
                    header: header.to_owned(),
                });
            }

            if !names.insert(name) {
                return Err(ParseError::DuplicateColumn {
                    column: name.to_owned(),
                });
            }

            Ok(Column {
                name: name.to_owned(),
                column_type,
            })
        })
        .collect()
}

fn parse_row(columns: &[Column], line: &str) -> Result<Row, ParseError> {
    let fields = line.split('\t').collect::<Vec<_>>();
    if fields.len() != columns.len() {
        return Err(ParseError::ColumnCount {
            expected: columns.len(),
            found: fields.len(),
            row: line.to_owned(),
        });
    }

    let mut row = Row::new();
    for (column, field) in columns.iter().zip(fields) {
        if let Some(value) = parse_field(column.column_type, field)? {
            row.insert(column.name.clone(), value);
        }
    }

    Ok(row)
}

fn parse_field(column_type: ColumnType, field: &str) -> Result<Option<Value>, ParseError> {
    if field == EMPTY_FIELD {
        return Ok(None);
    }

    let value = match column_type {
        ColumnType::Str => Value::Str(field.to_owned()),
        ColumnType::Int => Value::Int(field.parse().map_err(|_| ParseError::ParseIntField {
            value: field.to_owned(),
        })?),
        ColumnType::Span => Value::Span(parse_span(field)?),
    };

    Ok(Some(value))
}

fn parse_span(field: &str) -> Result<Span, ParseError> {
    let err = || ParseError::ParseSpanField {
        value: field.to_owned(),
    };

    let (begin, end) = field.split_once(SPAN_SEPARATOR).ok_or_else(err)?;
    let begin = begin.parse::<usize>().map_err(|_| err())?;
    let end = end.parse::<usize>().map_err(|_| err())?;

    if begin > end {
        return Err(err());
    }

    Ok(Span::new(begin, end))
}

/// A trait for objects that can write `TokenTable`s.
pub trait WriteTable {
    /// Write a table into this object.
    ///
    /// # Errors
    ///
    /// A call to `write_table` may generate an error to indicate that
    /// the operation could not be completed.
    fn write_table(&mut self, table: &TokenTable) -> Result<(), IOError>;
}

/// A writer for token tables.
///
/// This writer will write tables to the embedded writer in the
/// tab-separated format. Columns are written in lexicographical order.
/// Empty tables are skipped, since they have no columns.
pub struct Writer<W> {
    write: W,
    first: bool,
}

impl<W: io::Write> Writer<W> {
    /// Construct a new writer from an object that implements the `io::Write`
    /// trait.
    pub fn new(write: W) -> Writer<W> {
        Writer { write, first: true }
    }

    /// Borrow the embedded writer. Getting the underlying writer is often
    /// useful when the writer writes to a memory object.
    pub fn get_ref(&self) -> &W {
        &self.write
    }

    /// Unwrap the embedded writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W: io::Write> WriteTable for Writer<W> {
    fn write_table(&mut self, table: &TokenTable) -> Result<(), IOError> {
        if table.is_empty() {
            return Ok(());
        }

        let columns = table_columns(table)?;

        // Format the complete table first, so that nothing is written
        // for a table that cannot be read back.
        let lines = table
            .iter()
            .enumerate()
            .map(|(idx, row)| format_row(&columns, idx, row))
            .collect::<Result<Vec<_>, _>>()?;

        if self.first {
            self.first = false;
        } else {
            writeln!(self.write)?;
        }

        writeln!(self.write, "{}", columns.iter().join("\t"))?;

        for line in lines {
            writeln!(self.write, "{}", line)?;
        }

        Ok(())
    }
}

fn format_row(columns: &[Column], idx: usize, row: &Row) -> Result<String, IOError> {
    let line = columns
        .iter()
        .map(|column| match row.get(&column.name) {
            None => Ok(EMPTY_FIELD.to_owned()),
            Some(Value::Str(s)) => {
                if s == EMPTY_FIELD || s.contains(&['\t', '\n', '\r'][..]) {
                    Err(IOError::InvalidValue {
                        column: column.name.clone(),
                        value: s.clone(),
                    })
                } else {
                    Ok(s.clone())
                }
            }
            Some(Value::Int(i)) => Ok(i.to_string()),
            Some(Value::Span(span)) => Ok(format!(
                "{}{}{}",
                span.begin(),
                SPAN_SEPARATOR,
                span.end()
            )),
        })
        .collect::<Result<Vec<_>, _>>()?
        .join("\t");

    // A blank line would be read as a table separator.
    if line.trim().is_empty() {
        return Err(IOError::BlankRow { row: idx });
    }

    Ok(line)
}

/// Get the column declarations of a table.
///
/// The type of a column is the type of its values.
fn table_columns(table: &TokenTable) -> Result<Vec<Column>, IOError> {
    table
        .columns()
        .into_iter()
        .map(|name| {
            if name.is_empty()
                || name.starts_with('#')
                || name.contains(&[':', '\t', '\n', '\r'][..])
            {
                return Err(IOError::InvalidColumnName {
                    column: name.to_owned(),
                });
            }

            let types = table
                .column(name)
                .flatten()
                .map(ColumnType::of)
                .dedup()
                .collect::<Vec<_>>();

            if !types.iter().all_equal() {
                return Err(IOError::MixedColumnTypes {
                    column: name.to_owned(),
                });
            }

            Ok(Column {
                name: name.to_owned(),
                column_type: types.first().copied().unwrap_or(ColumnType::Str),
            })
        })
        .collect()
}
