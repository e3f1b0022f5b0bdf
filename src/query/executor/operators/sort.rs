// Sort Operator Implementation
//
// Materializes its whole input at open time and serves the rows in order.

use std::cmp::Ordering;

use log::{debug, warn};

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryError, QueryResult, Row};

const OPERATOR_NAME: &str = "Sort";

/// Blocking sort over the full input.
///
/// With a key column, rows are ordered by that column's text, byte by byte,
/// and the sort is stable so equal keys keep their input order. Without a
/// key, rows are ordered by [`Row`]'s whole-row ordering.
pub struct SortOperator {
    input: Box<dyn Operator>,
    sort_column: Option<String>,
    descending: bool,

    /// Materialized input, in output order
    sorted_rows: Vec<Row>,
    /// Next row to serve
    index: usize,
    state: OperatorState,
}

impl SortOperator {
    pub fn by_column(input: Box<dyn Operator>, column: impl Into<String>) -> Self {
        Self::new(input, Some(column.into()))
    }

    pub fn by_all_columns(input: Box<dyn Operator>) -> Self {
        Self::new(input, None)
    }

    fn new(input: Box<dyn Operator>, sort_column: Option<String>) -> Self {
        SortOperator {
            input,
            sort_column,
            descending: false,
            sorted_rows: Vec::new(),
            index: 0,
            state: OperatorState::default(),
        }
    }

    /// Reverse the output order
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    fn sort_rows(&self, rows: &mut [Row]) -> QueryResult<()> {
        match &self.sort_column {
            Some(column) => {
                if let Some(row) = rows.iter().find(|row| !row.contains(column)) {
                    return Err(QueryError::SchemaError(format!(
                        "sort column '{}' not found in row {{{}}}",
                        column, row
                    )));
                }
                rows.sort_by(|a, b| self.directed(a.get(column).cmp(&b.get(column))));
            }
            None => rows.sort_by(|a, b| self.directed(a.cmp(b))),
        }
        Ok(())
    }

    // Read all input rows into memory, in output order
    fn materialize(&mut self) -> QueryResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.input.next()? {
            rows.push(row);
        }
        self.sort_rows(&mut rows)?;
        Ok(rows)
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        if self.descending { ordering.reverse() } else { ordering }
    }
}

impl Operator for SortOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        self.input.open()?;

        let rows = match self.materialize() {
            Ok(rows) => rows,
            Err(e) => {
                // Leave the input closed so the sort can be opened again
                if let Err(close_err) = self.input.close() {
                    warn!("{} failed to close input after error: {}", OPERATOR_NAME, close_err);
                }
                return Err(e);
            }
        };
        debug!(
            "{} materialized {} rows by {}",
            OPERATOR_NAME,
            rows.len(),
            self.sort_column.as_deref().unwrap_or("all columns")
        );

        self.sorted_rows = rows;
        self.index = 0;
        self.state.mark_opened();
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        match self.sorted_rows.get(self.index) {
            Some(row) => {
                self.index += 1;
                Ok(Some(row.clone()))
            }
            None => {
                self.state.exhaust();
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.sorted_rows = Vec::new();
        self.index = 0;
        self.input.close()
    }
}
