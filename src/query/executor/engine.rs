// Query Execution Engine Implementation
//
// This module drives an operator tree to completion: open the root, pull
// until end of stream, close the root, and collect what came out.

use log::{debug, info, warn};

use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryResult, QueryResultSet, Row};

/// Runs operator trees and materializes their output
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    /// Stop after this many rows; the tree is closed early
    row_limit: Option<usize>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        ExecutionEngine { row_limit: None }
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Execute a tree and collect its rows.
    ///
    /// The tree is closed whether or not pulling succeeded; a pull error is
    /// reported in preference to a close error. Rows delivered before an
    /// error are discarded with the result set.
    pub fn execute(&self, root: &mut dyn Operator) -> QueryResult<QueryResultSet> {
        root.open()?;

        let pulled = self.pull_all(root);
        let closed = root.close();

        let rows = match (pulled, closed) {
            (Ok(rows), Ok(())) => rows,
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    warn!("close after failed pull also failed: {}", close_err);
                }
                return Err(e);
            }
            (Ok(_), Err(e)) => return Err(e),
        };

        let columns = rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();
        let mut result_set = QueryResultSet::new(columns);
        for row in rows {
            result_set.add_row(row);
        }

        info!("query produced {} rows", result_set.row_count());
        Ok(result_set)
    }

    /// Execute an owned tree
    pub fn execute_boxed(&self, mut root: Box<dyn Operator>) -> QueryResult<QueryResultSet> {
        self.execute(root.as_mut())
    }

    /// Execute a tree, handing every row to `sink` as it arrives instead of
    /// collecting. Returns the number of rows delivered.
    pub fn for_each_row<F>(&self, root: &mut dyn Operator, mut sink: F) -> QueryResult<usize>
    where
        F: FnMut(Row),
    {
        root.open()?;

        let mut delivered = 0;
        let pulled = loop {
            if self.row_limit.is_some_and(|limit| delivered >= limit) {
                break Ok(());
            }
            match root.next() {
                Ok(Some(row)) => {
                    sink(row);
                    delivered += 1;
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        let closed = root.close();
        pulled?;
        closed?;
        debug!("streamed {} rows", delivered);
        Ok(delivered)
    }

    fn pull_all(&self, root: &mut dyn Operator) -> QueryResult<Vec<Row>> {
        let mut rows = Vec::new();
        while self.row_limit.is_none_or(|limit| rows.len() < limit) {
            match root.next()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }
}
