// Tuplestream Query Executor
//
// Pull-based ("Volcano") relational operators over CSV files and in-memory
// row sets.

pub mod config;
pub mod query;

// Re-export key items for convenient access
pub use config::CsvScanConfig;
pub use query::executor::engine::ExecutionEngine;
pub use query::executor::operators::{
    AggregateOperator, AggregateType, Comparison, CsvScanOperator, DistinctOperator, FilterOperator, Operator,
    ProjectedColumn, ProjectionOperator, SortOperator, ValuesOperator,
};
pub use query::executor::result::{QueryError, QueryResult, QueryResultSet, Row};
