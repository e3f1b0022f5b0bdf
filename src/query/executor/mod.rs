// Query Executor Module
//
// This module is responsible for executing operator trees and producing results.
// It implements the iterator-based execution model for query processing.

// Re-export public components
pub mod engine;
pub mod result;
pub mod operators;

// Export key types
pub use self::engine::ExecutionEngine;
pub use self::result::{QueryError, QueryResult, QueryResultSet, Row};
pub use self::operators::{Operator, OperatorState};
