// Scalar Aggregation Operator
//
// Drains its input on the first pull and emits exactly one row holding
// the aggregate of one column. Values are parsed as f64.

use log::debug;

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryError, QueryResult, Row};
use super::AggregateType;

const OPERATOR_NAME: &str = "Aggregate";

/// Running state of one aggregate
#[derive(Debug, Clone, Default)]
struct Accumulator {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn update(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Final value. AVG, MIN and MAX have no value over zero rows.
    fn result(&self, agg_type: AggregateType, column: &str) -> QueryResult<f64> {
        let empty = || QueryError::EmptyInput(format!("{}({}) over zero rows", agg_type, column));

        match agg_type {
            AggregateType::Count => Ok(self.count as f64),
            AggregateType::Sum => Ok(self.sum),
            AggregateType::Avg => {
                if self.count == 0 {
                    Err(empty())
                } else {
                    Ok(self.sum / self.count as f64)
                }
            }
            AggregateType::Min => self.min.ok_or_else(empty),
            AggregateType::Max => self.max.ok_or_else(empty),
        }
    }
}

/// Reduces the whole input to one row `{output_column: aggregate(column)}`
pub struct AggregateOperator {
    input: Box<dyn Operator>,
    column: String,
    agg_type: AggregateType,
    output_column: String,
    /// Whether the single output row has been returned
    emitted: bool,
    state: OperatorState,
}

impl AggregateOperator {
    pub fn new(input: Box<dyn Operator>, column: impl Into<String>, agg_type: AggregateType) -> Self {
        AggregateOperator {
            input,
            column: column.into(),
            agg_type,
            output_column: agg_type.default_output_name().to_string(),
            emitted: false,
            state: OperatorState::default(),
        }
    }

    /// Average of `column`, written to the `average` column
    pub fn average(input: Box<dyn Operator>, column: impl Into<String>) -> Self {
        Self::new(input, column, AggregateType::Avg)
    }

    pub fn with_output_column(mut self, name: impl Into<String>) -> Self {
        self.output_column = name.into();
        self
    }

    fn parse_value(&self, row: &Row) -> QueryResult<f64> {
        let raw = row.get(&self.column).ok_or_else(|| {
            QueryError::SchemaError(format!("aggregate column '{}' not found in input row", self.column))
        })?;

        raw.trim().parse::<f64>().map_err(|e| {
            QueryError::ParseError(format!(
                "Cannot convert '{}' in column '{}' to a number: {}",
                raw, self.column, e
            ))
        })
    }

    fn aggregate_input(&mut self) -> QueryResult<Row> {
        let mut acc = Accumulator::default();
        while let Some(row) = self.input.next()? {
            let value = self.parse_value(&row)?;
            acc.update(value);
        }

        let result = acc.result(self.agg_type, &self.column)?;
        debug!(
            "{} {}({}) over {} rows = {}",
            OPERATOR_NAME, self.agg_type, self.column, acc.count, result
        );

        let mut row = Row::new();
        row.set(self.output_column.clone(), result.to_string());
        Ok(row)
    }
}

impl Operator for AggregateOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        self.input.open()?;
        self.emitted = false;
        self.state.mark_opened();
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        if self.emitted {
            self.state.exhaust();
            return Ok(None);
        }

        match self.aggregate_input() {
            Ok(row) => {
                self.emitted = true;
                Ok(Some(row))
            }
            Err(e) => {
                // The input is partly consumed; no aggregate until reopened
                self.state.exhaust();
                Err(e)
            }
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.emitted = false;
        self.input.close()
    }
}
