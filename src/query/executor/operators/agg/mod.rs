// Aggregation Operators Module
//
// This module contains the operator that reduces its whole input to a
// single row holding one aggregate (AVG, COUNT, SUM, MIN, MAX) of a column.

mod scalar;

use std::fmt;
use std::str::FromStr;

use crate::query::executor::result::QueryError;

// Re-export public components
pub use scalar::AggregateOperator;

// Types of supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateType {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateType {
    /// Output column used when the caller does not name one
    pub fn default_output_name(self) -> &'static str {
        match self {
            AggregateType::Count => "count",
            AggregateType::Sum => "sum",
            AggregateType::Avg => "average",
            AggregateType::Min => "min",
            AggregateType::Max => "max",
        }
    }
}

impl FromStr for AggregateType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateType::Count),
            "sum" => Ok(AggregateType::Sum),
            "avg" | "average" => Ok(AggregateType::Avg),
            "min" => Ok(AggregateType::Min),
            "max" => Ok(AggregateType::Max),
            _ => Err(QueryError::ParseError(format!("Unsupported aggregate function: {}", s))),
        }
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateType::Count => "COUNT",
            AggregateType::Sum => "SUM",
            AggregateType::Avg => "AVG",
            AggregateType::Min => "MIN",
            AggregateType::Max => "MAX",
        };
        f.write_str(name)
    }
}
