// Distinct Operator Implementation
//
// Removes consecutive duplicate rows. Only adjacent duplicates are merged,
// so global deduplication needs an input already sorted on all columns.

use log::debug;

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryResult, Row};

const OPERATOR_NAME: &str = "Distinct";

pub struct DistinctOperator {
    input: Box<dyn Operator>,
    /// Last row returned
    last_row: Option<Row>,
    /// Duplicates skipped since open
    skipped: u64,
    state: OperatorState,
}

impl DistinctOperator {
    pub fn new(input: Box<dyn Operator>) -> Self {
        DistinctOperator {
            input,
            last_row: None,
            skipped: 0,
            state: OperatorState::default(),
        }
    }
}

impl Operator for DistinctOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        self.input.open()?;
        self.last_row = None;
        self.skipped = 0;
        self.state.mark_opened();
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        while let Some(row) = self.input.next()? {
            if self.last_row.as_ref() == Some(&row) {
                self.skipped += 1;
                continue;
            }
            self.last_row = Some(row.clone());
            return Ok(Some(row));
        }

        debug!("{} exhausted, {} duplicates skipped", OPERATOR_NAME, self.skipped);
        self.state.exhaust();
        Ok(None)
    }

    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.last_row = None;
        self.skipped = 0;
        self.input.close()
    }
}
