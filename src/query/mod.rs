// Query Processing Module
//
// This module contains the pull-based operators and the engine that runs them.

pub mod executor;

// Export key public interfaces
pub use executor::engine::ExecutionEngine;
pub use executor::operators::Operator;
pub use executor::result::{QueryError, QueryResult, Row};
