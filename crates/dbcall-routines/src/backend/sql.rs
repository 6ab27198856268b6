//! Executing routine commands over a `Connection`

use async_trait::async_trait;
use dbcall_core::{Connection, DbcallError, QueryResult, Result, Value};
use std::sync::Arc;

use crate::config::is_valid_prefix;
use crate::{CommandExecutor, CommandKind, Direction, ProcedureDialect, RoutineCommand};

/// A command rendered into driver SQL
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    /// SQL with dialect placeholders
    pub sql: String,
    /// Values for the placeholders, in order
    pub params: Vec<Value>,
    /// Session variables to assign before the call (MySQL `INOUT`)
    pub session_inputs: Vec<(String, Value)>,
    /// Session variables to select after the call (MySQL `OUT`/`INOUT`)
    pub session_outputs: Vec<String>,
}

impl RenderedStatement {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self {
            sql,
            params,
            session_inputs: Vec::new(),
            session_outputs: Vec::new(),
        }
    }
}

/// `CommandExecutor` backed by a database connection
///
/// Commands are rendered for the connection's dialect:
/// - queries get their bind names replaced with positional placeholders
/// - procedures become `CALL name(...)` or `EXEC name ...`
///
/// Bind tokens are recognised by the prefix the command was built with.
///
/// Output values are read back from the first row the backend returns, by
/// column name. Procedures fall back to the position among the output
/// parameters, since that row holds only output values; a query's row is its
/// own result and is never matched by position. MySQL procedures write
/// outputs to session variables, which are selected after the call.
pub struct SqlCommandExecutor {
    connection: Arc<dyn Connection>,
    dialect: ProcedureDialect,
}

impl SqlCommandExecutor {
    /// Create an executor for a connection in the given dialect
    pub fn new(connection: Arc<dyn Connection>, dialect: ProcedureDialect) -> Self {
        Self {
            connection,
            dialect,
        }
    }

    /// Create an executor using the connection's reported dialect
    pub fn for_connection(connection: Arc<dyn Connection>) -> Result<Self> {
        let dialect = connection
            .dialect_id()
            .and_then(ProcedureDialect::from_dialect_id)
            .ok_or_else(|| {
                DbcallError::NotSupported(format!(
                    "routine calls are not supported for driver `{}`",
                    connection.driver_name()
                ))
            })?;
        Ok(Self::new(connection, dialect))
    }

    /// Get the dialect for this executor
    pub fn dialect(&self) -> ProcedureDialect {
        self.dialect
    }

    /// Render a command into SQL for this executor's dialect
    pub fn render(&self, command: &RoutineCommand) -> Result<RenderedStatement> {
        if !is_valid_prefix(&command.bind_prefix) {
            return Err(DbcallError::Query(format!(
                "bind prefix must be non-empty and free of whitespace, got {:?}",
                command.bind_prefix
            )));
        }
        match command.kind {
            CommandKind::Query => Ok(self.render_query(command)),
            CommandKind::StoredProcedure => self.render_procedure(command),
        }
    }

    fn render_query(&self, command: &RoutineCommand) -> RenderedStatement {
        let prefix = command.bind_prefix.as_str();
        let mut sql = String::with_capacity(command.text.len());
        let mut params = Vec::new();
        let mut rest = command.text.as_str();

        while let Some(pos) = rest.find(prefix) {
            sql.push_str(&rest[..pos]);
            let after = &rest[pos + prefix.len()..];
            let ident_len = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let token = &rest[pos..pos + prefix.len() + ident_len];

            match command.parameter(token).filter(|_| ident_len > 0) {
                Some(parameter) => {
                    params.push(parameter.value.clone());
                    sql.push_str(&self.dialect.placeholder(params.len()));
                }
                None => sql.push_str(token),
            }
            rest = &rest[pos + token.len()..];
        }
        sql.push_str(rest);

        RenderedStatement::new(sql, params)
    }

    fn render_procedure(&self, command: &RoutineCommand) -> Result<RenderedStatement> {
        if !self.dialect.supports_procedures() {
            return Err(DbcallError::NotSupported(format!(
                "{:?} has no stored procedures, cannot call `{}`",
                self.dialect, command.text
            )));
        }

        let mut statement = RenderedStatement::new(String::new(), Vec::new());
        let mut arguments = Vec::with_capacity(command.parameters.len());

        for parameter in &command.parameters {
            let name = command.bare_name(&parameter.bind_name);
            let argument = match (self.dialect, parameter.direction) {
                (ProcedureDialect::MySQL, Direction::In) => {
                    statement.params.push(parameter.value.clone());
                    "?".to_string()
                }
                (ProcedureDialect::MySQL, direction) => {
                    let variable = format!("@{}", name);
                    if direction == Direction::InOut {
                        statement
                            .session_inputs
                            .push((variable.clone(), parameter.value.clone()));
                    }
                    statement.session_outputs.push(variable.clone());
                    variable
                }
                (ProcedureDialect::PostgreSQL, Direction::Out) => "NULL".to_string(),
                (ProcedureDialect::MsSql, Direction::Out) => format!("@{} OUTPUT", name),
                (_, direction) => {
                    statement.params.push(parameter.value.clone());
                    let placeholder = self.dialect.placeholder(statement.params.len());
                    if self.dialect == ProcedureDialect::MsSql && direction == Direction::InOut {
                        format!("{} OUTPUT", placeholder)
                    } else {
                        placeholder
                    }
                }
            };
            arguments.push(argument);
        }

        statement.sql = match self.dialect {
            ProcedureDialect::MsSql if arguments.is_empty() => {
                format!("{} {}", self.dialect.call_keyword(), command.text)
            }
            ProcedureDialect::MsSql => format!(
                "{} {} {}",
                self.dialect.call_keyword(),
                command.text,
                arguments.join(", ")
            ),
            _ => format!(
                "{} {}({})",
                self.dialect.call_keyword(),
                command.text,
                arguments.join(", ")
            ),
        };
        Ok(statement)
    }

    async fn run(&self, command: &mut RoutineCommand) -> Result<QueryResult> {
        let statement = self.render(command)?;

        for (variable, value) in &statement.session_inputs {
            let assigned = self
                .connection
                .execute(&format!("SET {} = ?", variable), std::slice::from_ref(value))
                .await?;
            tracing::debug!(%variable, affected = assigned.affected_rows, "session variable set");
        }

        let result = self.connection.query(&statement.sql, &statement.params).await?;

        if !statement.session_outputs.is_empty() {
            let select = format!("SELECT {}", statement.session_outputs.join(", "));
            let outputs = self.connection.query(&select, &[]).await?;
            self.apply_outputs(command, &outputs);
        } else if command.has_outputs() {
            self.apply_outputs(command, &result);
        }

        Ok(result)
    }

    fn apply_outputs(&self, command: &mut RoutineCommand, result: &QueryResult) {
        let Some(row) = result.rows.first() else {
            tracing::debug!(command = %command.text, "no row to read output parameters from");
            return;
        };

        let positional = command.kind == CommandKind::StoredProcedure;
        let prefix = command.bind_prefix.clone();
        for (position, parameter) in command
            .parameters
            .iter_mut()
            .filter(|p| p.direction.is_output())
            .enumerate()
        {
            let column = parameter
                .bind_name
                .strip_prefix(prefix.as_str())
                .unwrap_or(&parameter.bind_name);
            let value = row
                .get_by_name(column)
                .or_else(|| positional.then(|| row.get(position)).flatten());
            if let Some(value) = value {
                parameter.value = value.clone();
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for SqlCommandExecutor {
    #[tracing::instrument(skip(self, command), fields(driver = self.connection.driver_name(), command = %command.text))]
    async fn fill(&self, command: &mut RoutineCommand) -> Result<QueryResult> {
        let result = self.run(command).await?;
        tracing::debug!(rows = result.row_count(), "result set filled");
        Ok(result)
    }

    #[tracing::instrument(skip(self, command), fields(driver = self.connection.driver_name(), command = %command.text))]
    async fn execute_scalar(&self, command: &mut RoutineCommand) -> Result<Value> {
        let result = self.run(command).await?;
        Ok(result.first_value().cloned().unwrap_or(Value::Null))
    }
}
