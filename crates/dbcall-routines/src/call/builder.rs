//! Command building
//!
//! Turns a routine descriptor and the caller's input values into the command
//! a backend executes: command text, command kind and bind parameters.

use dbcall_core::Value;
use serde::Serialize;

use crate::config::is_valid_prefix;
use crate::{resolve_direction, CallError, Direction, InvokerConfig, Result, RoutineDescriptor};

/// How the backend should treat the command text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// The text is a bare routine name executed as a procedure call
    StoredProcedure,
    /// The text is a query
    Query,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::StoredProcedure => "stored_procedure",
            CommandKind::Query => "query",
        }
    }
}

/// A parameter as handed to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendParameter {
    /// Prefixed bind name, e.g. `@acct`
    pub bind_name: String,
    /// Resolved direction
    pub direction: Direction,
    /// Bound input, or the value written by the backend after execution.
    /// `Null` for `Out` parameters until then.
    pub value: Value,
}

/// A command ready for execution
///
/// Backends write output values into `parameters` in place; they are read
/// back only after execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineCommand {
    /// Command text
    pub text: String,
    /// How the text is executed
    pub kind: CommandKind,
    /// Prefix the bind names in `text` and `parameters` carry
    pub bind_prefix: String,
    /// One entry per routine parameter, in declaration order
    pub parameters: Vec<BackendParameter>,
}

impl RoutineCommand {
    /// Find a parameter by its prefixed bind name
    pub fn parameter(&self, bind_name: &str) -> Option<&BackendParameter> {
        self.parameters.iter().find(|p| p.bind_name == bind_name)
    }

    /// Values bound to input parameters, in parameter order
    pub fn bound_values(&self) -> Vec<&Value> {
        self.parameters
            .iter()
            .filter(|p| p.direction.is_input())
            .map(|p| &p.value)
            .collect()
    }

    /// Strip the command's bind prefix from a bind name
    pub fn bare_name<'a>(&self, bind_name: &'a str) -> &'a str {
        bind_name
            .strip_prefix(self.bind_prefix.as_str())
            .unwrap_or(bind_name)
    }

    /// Check if any parameter receives a value from the backend
    pub fn has_outputs(&self) -> bool {
        self.parameters.iter().any(|p| p.direction.is_output())
    }
}

/// Builds backend commands from routine descriptors
#[derive(Debug, Clone)]
pub struct CallBuilder {
    bind_prefix: String,
}

impl CallBuilder {
    /// Create a builder using the given bind parameter prefix
    ///
    /// # Panics
    ///
    /// Panics if the prefix is empty or contains whitespace.
    pub fn new(bind_prefix: impl Into<String>) -> Self {
        let bind_prefix = bind_prefix.into();
        assert!(
            is_valid_prefix(&bind_prefix),
            "bind prefix must be non-empty and free of whitespace, got {:?}",
            bind_prefix
        );
        Self { bind_prefix }
    }

    /// Create a builder from invoker configuration
    pub fn from_config(config: &InvokerConfig) -> Self {
        Self::new(config.bind_prefix())
    }

    /// Build the command for `routine`
    ///
    /// Input values are consumed in order by `In` and `InOut` parameters only;
    /// `Out` parameters are bound to `NULL`. Procedures keep the bare routine
    /// name as command text, composable functions are wrapped in
    /// `SELECT * FROM name(@a,@b)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbcall_core::{Value, ValueType};
    /// use dbcall_routines::{CallBuilder, CommandKind, ParameterDescriptor, RoutineDescriptor};
    ///
    /// let routine = RoutineDescriptor::function("GETBAL")
    ///     .with_parameter(ParameterDescriptor::new("acct", ValueType::Int32));
    /// let command = CallBuilder::new("@").build(&routine, &[Value::Int32(42)]).unwrap();
    ///
    /// assert_eq!(command.text, "SELECT * FROM GETBAL(@acct)");
    /// assert_eq!(command.kind, CommandKind::Query);
    /// ```
    pub fn build(&self, routine: &RoutineDescriptor, inputs: &[Value]) -> Result<RoutineCommand> {
        let mut parameters = Vec::with_capacity(routine.parameters.len());
        let mut remaining = inputs.iter();

        for parameter in &routine.parameters {
            let bind_name = self.bind_name(routine, &parameter.name, parameter.bind_name.as_deref())?;
            let direction = resolve_direction(parameter);

            let value = if direction.is_input() {
                match remaining.next() {
                    Some(value) => value.clone(),
                    None => {
                        return Err(CallError::InvalidCall(format!(
                            "routine `{}` expects {} input values, got {}",
                            routine.mapped_name,
                            count_inputs(routine),
                            inputs.len()
                        )));
                    }
                }
            } else {
                Value::Null
            };

            parameters.push(BackendParameter {
                bind_name,
                direction,
                value,
            });
        }

        let surplus = remaining.len();
        if surplus > 0 {
            tracing::warn!(
                routine = %routine.mapped_name,
                surplus,
                "ignoring surplus input values"
            );
        }

        let (text, kind) = if routine.composable {
            let bind_list: Vec<&str> = parameters.iter().map(|p| p.bind_name.as_str()).collect();
            (
                format!("SELECT * FROM {}({})", routine.mapped_name, bind_list.join(",")),
                CommandKind::Query,
            )
        } else {
            (routine.mapped_name.clone(), CommandKind::StoredProcedure)
        };

        tracing::debug!(
            routine = %routine.mapped_name,
            kind = kind.as_str(),
            parameters = parameters.len(),
            "command built"
        );

        Ok(RoutineCommand {
            text,
            kind,
            bind_prefix: self.bind_prefix.clone(),
            parameters,
        })
    }

    fn bind_name(
        &self,
        routine: &RoutineDescriptor,
        parameter: &str,
        bind_name: Option<&str>,
    ) -> Result<String> {
        match bind_name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(format!("{}{}", self.bind_prefix, name)),
            _ => Err(CallError::InvalidCall(format!(
                "parameter `{}` of routine `{}` has no bind name",
                parameter, routine.mapped_name
            ))),
        }
    }
}

fn count_inputs(routine: &RoutineDescriptor) -> usize {
    routine
        .parameters
        .iter()
        .filter(|p| resolve_direction(p).is_input())
        .count()
}
