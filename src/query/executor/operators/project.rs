// Projection Operator Implementation
//
// This module implements the projection operator for selecting and
// renaming specific columns.

use log::debug;

use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryError, QueryResult, Row};

const OPERATOR_NAME: &str = "Projection";

/// One output column of a projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedColumn {
    /// Column read from the input row
    pub source: String,
    /// Column written to the output row
    pub name: String,
}

impl ProjectedColumn {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        ProjectedColumn {
            name: source.clone(),
            source,
        }
    }

    pub fn aliased(source: impl Into<String>, name: impl Into<String>) -> Self {
        ProjectedColumn {
            source: source.into(),
            name: name.into(),
        }
    }

    /// Parse `source` or `source as name` (the keyword is case-insensitive)
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split_whitespace().collect();
        match parts.as_slice() {
            [source, kw, name] if kw.eq_ignore_ascii_case("as") => ProjectedColumn::aliased(*source, *name),
            _ => ProjectedColumn::new(text.trim()),
        }
    }
}

/// Projection operator that selects specific columns from input rows
pub struct ProjectionOperator {
    /// The input operator
    input: Box<dyn Operator>,
    /// The columns to project
    columns: Vec<ProjectedColumn>,
    state: OperatorState,
}

impl ProjectionOperator {
    /// Create a new projection keeping the named columns
    pub fn new(input: Box<dyn Operator>, columns: Vec<String>) -> Self {
        Self::with_columns(input, columns.into_iter().map(ProjectedColumn::new).collect())
    }

    pub fn with_columns(input: Box<dyn Operator>, columns: Vec<ProjectedColumn>) -> Self {
        ProjectionOperator {
            input,
            columns,
            state: OperatorState::default(),
        }
    }

    /// Project a row to only include the specified columns.
    ///
    /// A source column missing from the input row is a schema error.
    fn project_row(&self, row: &Row) -> QueryResult<Row> {
        let mut projected_row = Row::new();

        for column in &self.columns {
            let value = row.get(&column.source).ok_or_else(|| {
                QueryError::SchemaError(format!("column '{}' not found in input row", column.source))
            })?;
            projected_row.set(column.name.clone(), value.to_string());
        }

        Ok(projected_row)
    }
}

impl Operator for ProjectionOperator {
    /// Initialize the operator
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;
        if self.columns.is_empty() {
            return Err(QueryError::InvalidOperation("projection with no columns".to_string()));
        }

        self.input.open()?;
        self.state.mark_opened();
        debug!("{} opened with columns {:?}", OPERATOR_NAME, self.columns);
        Ok(())
    }

    /// Get the next row with projected columns
    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        match self.input.next()? {
            Some(row) => Ok(Some(self.project_row(&row)?)),
            None => {
                self.state.exhaust();
                Ok(None)
            }
        }
    }

    /// Close the operator
    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.input.close()
    }
}
