//! Connection trait

use crate::{QueryResult, Result, StatementResult, Value};
use async_trait::async_trait;

/// An already-open database connection
///
/// Acquiring and releasing connections is the caller's business; routines
/// only borrow a connection for the duration of a single call.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite", "postgresql", "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a statement that does not return rows
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query that returns rows
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Get the dialect identifier for this connection (e.g., "sqlite", "postgresql")
    ///
    /// Used to pick placeholder and procedure-call syntax. Returns None if the
    /// dialect is unknown.
    fn dialect_id(&self) -> Option<&'static str> {
        None
    }
}
