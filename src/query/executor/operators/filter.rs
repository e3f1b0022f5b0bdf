// Filter Operator Implementation
//
// This module implements the filter operator for filtering rows based on predicates.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryError, QueryResult, Row};

const OPERATOR_NAME: &str = "Filter";

/// A pure boolean test over a row
pub type Predicate = Box<dyn Fn(&Row) -> bool + Send>;

/// Filter operator that filters rows based on a predicate
pub struct FilterOperator {
    /// The input operator
    input: Box<dyn Operator>,
    /// The predicate to evaluate
    predicate: Predicate,
    /// Rows rejected since open, for diagnostics
    rejected: u64,
    state: OperatorState,
}

impl FilterOperator {
    /// Create a new filter operator
    pub fn new<F>(input: Box<dyn Operator>, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + 'static,
    {
        FilterOperator {
            input,
            predicate: Box::new(predicate),
            rejected: 0,
            state: OperatorState::default(),
        }
    }
}

impl Operator for FilterOperator {
    /// Initialize the operator
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        self.input.open()?;
        self.rejected = 0;
        self.state.mark_opened();
        Ok(())
    }

    /// Get the next row that satisfies the predicate
    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        // Keep fetching rows from the input operator until we find one that
        // satisfies the predicate or we run out of rows
        while let Some(row) = self.input.next()? {
            if (self.predicate)(&row) {
                return Ok(Some(row));
            }
            self.rejected += 1;
        }

        debug!("{} exhausted, {} rows rejected", OPERATOR_NAME, self.rejected);
        self.state.exhaust();
        Ok(None)
    }

    /// Close the operator
    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.rejected = 0;
        self.input.close()
    }
}

/// Comparison operators understood by [`Comparison`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }
}

impl FromStr for CompareOp {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s {
            "=" | "==" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::NotEq),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::LtEq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::GtEq),
            _ => Err(QueryError::ParseError(format!("Unsupported operator: {}", s))),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        f.write_str(symbol)
    }
}

/// `column op literal` test over a row.
///
/// When both the row value and the literal parse as numbers they are
/// compared numerically, otherwise as text, byte by byte. A row without the
/// column never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: String,
}

impl Comparison {
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Comparison {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Parse `"column op value"`, e.g. `age > 30` or `name = "my grandmother"`.
    ///
    /// The three parts are separated by whitespace. A literal containing
    /// whitespace must be wrapped in double quotes, which are removed.
    pub fn parse(expr: &str) -> QueryResult<Self> {
        let malformed = || QueryError::ParseError(format!("Expected 'column op value', got '{}'", expr));

        let (column, rest) = expr.trim().split_once(char::is_whitespace).ok_or_else(malformed)?;
        let (op, value) = rest.trim_start().split_once(char::is_whitespace).ok_or_else(malformed)?;
        let value = value.trim();

        let value = match value.strip_prefix('"') {
            Some(quoted) => quoted.strip_suffix('"').ok_or_else(malformed)?,
            None if value.is_empty() || value.contains(char::is_whitespace) => return Err(malformed()),
            None => value,
        };

        Ok(Comparison::new(column, op.parse()?, value))
    }

    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(&self.column) else {
            return false;
        };

        let ordering = match (actual.trim().parse::<f64>(), self.value.trim().parse::<f64>()) {
            (Ok(a), Ok(b)) => match a.partial_cmp(&b) {
                Some(ordering) => ordering,
                None => return false,
            },
            _ => actual.cmp(self.value.as_str()),
        };

        self.op.accepts(ordering)
    }

    pub fn into_predicate(self) -> Predicate {
        Box::new(move |row| self.matches(row))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}

/// Predicate matching rows whose `column` holds exactly `value`
pub fn column_equals(column: impl Into<String>, value: impl Into<String>) -> Predicate {
    let column = column.into();
    let value = value.into();
    Box::new(move |row| row.get(&column) == Some(value.as_str()))
}
