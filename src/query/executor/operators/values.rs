// In-Memory Scan Operator
//
// Serves a fixed sequence of rows supplied at construction. Used to feed
// synthetic or already materialized data into a pipeline.

use log::{debug, trace};

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryResult, Row};

const OPERATOR_NAME: &str = "Values";

/// Scan over an owned list of rows
pub struct ValuesOperator {
    rows: Vec<Row>,
    index: usize,
    state: OperatorState,
}

impl ValuesOperator {
    pub fn new(rows: Vec<Row>) -> Self {
        ValuesOperator {
            rows,
            index: 0,
            state: OperatorState::default(),
        }
    }
}

impl Operator for ValuesOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        self.index = 0;
        self.state.mark_opened();
        debug!("{} opened with {} rows", OPERATOR_NAME, self.rows.len());
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        match self.rows.get(self.index) {
            Some(row) => {
                self.index += 1;
                trace!("{} row {}: {}", OPERATOR_NAME, self.index, row);
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
        self.index = 0;
        Ok(())
    }
}
