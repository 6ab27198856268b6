//! Command executor trait

use async_trait::async_trait;
use dbcall_core::{QueryResult, Result, Value};

use crate::RoutineCommand;

/// Executes routine commands against a backend
///
/// Each method executes the command exactly once. Implementations write the
/// values of `Out` and `InOut` parameters into `command.parameters` before
/// returning.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute and collect the full result set
    async fn fill(&self, command: &mut RoutineCommand) -> Result<QueryResult>;

    /// Execute and return the first column of the first row (`Null` if none)
    async fn execute_scalar(&self, command: &mut RoutineCommand) -> Result<Value>;
}
