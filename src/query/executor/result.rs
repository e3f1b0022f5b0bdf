// Query Result Implementation
//
// This module defines the row model, the error taxonomy and the result set
// produced by running an operator tree to completion.

use std::cmp::Ordering;
use std::fmt;

use linked_hash_map::LinkedHashMap;
use serde::Serialize;
use thiserror::Error;

/// A single tuple of named text values.
///
/// Every value is stored as text; operators that need a numeric view
/// (aggregation, numeric comparisons) parse on demand. Column names are
/// unique: setting an existing column overwrites its value in place.
///
/// Insertion order is remembered for display and serialization only. Equality and ordering
/// are defined over the name/value mapping and never depend on it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: LinkedHashMap<String, String>,
}

impl Row {
    /// Create a new empty row
    pub fn new() -> Self {
        Row {
            values: LinkedHashMap::new(),
        }
    }

    /// Create a row from `(column, value)` pairs; later duplicates win
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::new();
        for (col, val) in pairs {
            row.set(col.into(), val.into());
        }
        row
    }

    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Set a value for a column
    pub fn set(&mut self, column: String, value: String) {
        if let Some(existing) = self.values.get_mut(&column) {
            *existing = value;
        } else {
            self.values.insert(column, value);
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(column, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // Pairs ordered by column name; the canonical form used for comparison.
    fn sorted_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        if self.values.len() != other.values.len() {
            return false;
        }

        self.values
            .iter()
            .all(|(col, v1)| other.values.get(col).is_some_and(|v2| v1 == v2))
    }
}

impl Eq for Row {}

impl PartialOrd for Row {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whole-row ordering: columns are visited in ascending name order and
/// compared name first, then value, byte by byte. The first difference
/// decides; a row whose pairs are a prefix of the other's sorts first.
impl Ord for Row {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_pairs().cmp(&other.sorted_pairs())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (col, val) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", col, val)?;
        }
        Ok(())
    }
}

/// Represents query execution error
#[derive(Error, Debug)]
pub enum QueryError {
    /// A source could not be opened or read at open time
    #[error("Resource error: {0}")]
    ResourceError(String),
    /// A requested column is not present in a header or row
    #[error("Schema error: {0}")]
    SchemaError(String),
    /// A value or predicate could not be interpreted
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The underlying record reader failed after the header
    #[error("Stream error: {0}")]
    StreamError(String),
    /// The operator protocol was used out of order
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// An aggregate that has no value for zero rows saw no rows
    #[error("Empty input: {0}")]
    EmptyInput(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query resultset representation
#[derive(Debug, Default)]
pub struct QueryResultSet {
    /// Column names in the resultset
    columns: Vec<String>,
    /// Rows of data
    rows: Vec<Row>,
}

impl QueryResultSet {
    /// Create a new empty resultset with column names
    pub fn new(columns: Vec<String>) -> Self {
        QueryResultSet {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row to the resultset
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the columns in the resultset
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the rows in the resultset
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Format the resultset as a string table
    pub fn to_string_table(&self) -> String {
        if self.columns.is_empty() {
            return "Empty result".to_string();
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| row.get(col).map_or(4, str::len))
                    .fold(col.len(), usize::max)
            })
            .collect();

        let mut result = String::new();

        // Add column headers
        result.push_str("| ");
        for (col, width) in self.columns.iter().zip(&widths) {
            result.push_str(&format!("{:<width$} | ", col, width = *width));
        }
        result.push('\n');

        // Add separator
        result.push('|');
        for width in &widths {
            result.push_str(&format!("{}|", "-".repeat(width + 2)));
        }
        result.push('\n');

        // Add rows
        for row in &self.rows {
            result.push_str("| ");
            for (col, width) in self.columns.iter().zip(&widths) {
                let value = row.get(col).unwrap_or("NULL");
                result.push_str(&format!("{:<width$} | ", value, width = *width));
            }
            result.push('\n');
        }

        result
    }

    /// Return a message for empty result sets
    pub fn empty_message(&self) -> String {
        if self.columns.is_empty() {
            "Empty result".to_string()
        } else {
            format!("Empty result set with columns: {}", self.columns.join(", "))
        }
    }
}
