// Query Operators Module
//
// This module defines the operators used for query execution in the
// iterator-based execution model.

pub mod agg;
pub mod distinct;
pub mod filter;
pub mod project;
pub mod scan;
pub mod sort;
pub mod values;

use std::path::PathBuf;

use crate::query::executor::result::{QueryError, QueryResult, Row};

pub use agg::{AggregateOperator, AggregateType};
pub use distinct::DistinctOperator;
pub use filter::{Comparison, CompareOp, FilterOperator, Predicate};
pub use project::{ProjectedColumn, ProjectionOperator};
pub use scan::CsvScanOperator;
pub use sort::SortOperator;
pub use values::ValuesOperator;

/// The Operator trait defines the interface for all query execution operators
/// in the iterator-based execution model. Each operator owns its upstream,
/// pulls rows from it on demand and passes transformed rows to its caller.
///
/// Lifecycle: `open` exactly once, `next` until it yields `None`, then
/// `close`. A closed operator may be opened again and restarts from the
/// beginning. Once `next` has returned `None` it keeps returning `None`
/// until the operator is closed.
pub trait Operator: Send {
    /// Perform all fallible setup and open the upstream
    fn open(&mut self) -> QueryResult<()>;

    /// Get the next row, or `None` at end of stream
    fn next(&mut self) -> QueryResult<Option<Row>>;

    /// Release resources, reset counters and close the upstream
    fn close(&mut self) -> QueryResult<()>;
}

/// Lifecycle state shared by every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorState {
    #[default]
    Unopened,
    Opened,
    Exhausted,
    Closed,
}

impl OperatorState {
    /// Check that `open` is allowed: only an unopened or closed operator
    /// may be opened. The state moves to `Opened` via `mark_opened` once
    /// setup has succeeded, so a failed open leaves it unchanged.
    pub fn check_open(&self, operator: &str) -> QueryResult<()> {
        match self {
            OperatorState::Unopened | OperatorState::Closed => Ok(()),
            OperatorState::Opened | OperatorState::Exhausted => Err(QueryError::InvalidOperation(
                format!("{} is already open", operator),
            )),
        }
    }

    pub fn mark_opened(&mut self) {
        *self = OperatorState::Opened;
    }

    /// Check that `next` is allowed. Returns `false` when the operator is
    /// exhausted and the caller should answer `None` without doing any work.
    pub fn check_pull(&self, operator: &str) -> QueryResult<bool> {
        match self {
            OperatorState::Opened => Ok(true),
            OperatorState::Exhausted => Ok(false),
            OperatorState::Unopened => Err(QueryError::InvalidOperation(format!(
                "{} pulled before open",
                operator
            ))),
            OperatorState::Closed => Err(QueryError::InvalidOperation(format!(
                "{} pulled after close",
                operator
            ))),
        }
    }

    /// Record end of stream
    pub fn exhaust(&mut self) {
        *self = OperatorState::Exhausted;
    }

    /// Check that `close` is allowed and move to `Closed`.
    pub fn begin_close(&mut self, operator: &str) -> QueryResult<()> {
        match self {
            OperatorState::Opened | OperatorState::Exhausted => {
                *self = OperatorState::Closed;
                Ok(())
            }
            OperatorState::Unopened => Err(QueryError::InvalidOperation(format!(
                "{} closed before open",
                operator
            ))),
            OperatorState::Closed => Err(QueryError::InvalidOperation(format!(
                "{} is already closed",
                operator
            ))),
        }
    }
}

// Factory functions for creating operators

pub fn create_csv_scan(
    path: impl Into<PathBuf>,
    columns: Vec<String>,
) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(CsvScanOperator::new(path, columns)))
}

pub fn create_values_scan(rows: Vec<Row>) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(ValuesOperator::new(rows)))
}

pub fn create_filter(input: Box<dyn Operator>, predicate: Predicate) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(FilterOperator::new(input, predicate)))
}

pub fn create_projection(input: Box<dyn Operator>, columns: Vec<String>) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(ProjectionOperator::new(input, columns)))
}

pub fn create_sort(input: Box<dyn Operator>, sort_column: Option<String>) -> QueryResult<Box<dyn Operator>> {
    let op = match sort_column {
        Some(column) => SortOperator::by_column(input, column),
        None => SortOperator::by_all_columns(input),
    };
    Ok(Box::new(op))
}

pub fn create_distinct(input: Box<dyn Operator>) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(DistinctOperator::new(input)))
}

pub fn create_average(input: Box<dyn Operator>, column: &str) -> QueryResult<Box<dyn Operator>> {
    Ok(Box::new(AggregateOperator::average(input, column)))
}
