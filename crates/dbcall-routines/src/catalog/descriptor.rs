//! Routine and parameter descriptors
//!
//! Descriptors are plain data, resolved once when a catalog is loaded and
//! shared read-only by every call that uses them.

use dbcall_core::DeclaredType;
use serde::{Deserialize, Serialize};

use crate::Direction;

/// What a routine hands back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// A result set of unknown shape, filled into a tabular container
    ResultSet,
    /// A single value (first column of the first row)
    #[default]
    Scalar,
}

/// A formal parameter of a routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Declared parameter name
    pub name: String,
    /// Declared type, possibly carrying the by-reference marker
    pub declared_type: DeclaredType,
    /// Set for parameters the backend only writes to
    #[serde(default)]
    pub output_only: bool,
    /// Explicit direction supplied by the metadata producer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Backend bind name (without prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_name: Option<String>,
}

impl ParameterDescriptor {
    /// Create a parameter whose bind name equals its declared name
    pub fn new(name: impl Into<String>, declared_type: impl Into<DeclaredType>) -> Self {
        let name = name.into();
        Self {
            bind_name: Some(name.clone()),
            name,
            declared_type: declared_type.into(),
            output_only: false,
            direction: None,
        }
    }

    /// Override the backend bind name
    pub fn with_bind_name(mut self, bind_name: impl Into<String>) -> Self {
        self.bind_name = Some(bind_name.into());
        self
    }

    /// Mark the parameter as written by the backend only
    pub fn output_only(mut self) -> Self {
        self.output_only = true;
        self
    }

    /// Pin the direction instead of inferring it
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Everything needed to invoke one backend routine
///
/// # Examples
///
/// ```
/// use dbcall_routines::{ParameterDescriptor, RoutineDescriptor};
/// use dbcall_core::ValueType;
///
/// let routine = RoutineDescriptor::function("GETBAL")
///     .with_parameter(ParameterDescriptor::new("acct", ValueType::Int32));
/// assert!(routine.composable);
/// assert_eq!(routine.parameters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDescriptor {
    /// Routine name as known to the backend
    pub mapped_name: String,
    /// `true` for functions callable inside a SELECT, `false` for procedures
    #[serde(default)]
    pub composable: bool,
    /// Declared return shape
    #[serde(default)]
    pub returns: ReturnShape,
    /// Formal parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl RoutineDescriptor {
    /// Describe a stored procedure invoked directly
    pub fn procedure(mapped_name: impl Into<String>) -> Self {
        Self {
            mapped_name: mapped_name.into(),
            composable: false,
            returns: ReturnShape::Scalar,
            parameters: Vec::new(),
        }
    }

    /// Describe a function composed into `SELECT * FROM name(...)`
    pub fn function(mapped_name: impl Into<String>) -> Self {
        Self {
            composable: true,
            ..Self::procedure(mapped_name)
        }
    }

    /// Set the return shape
    pub fn returning(mut self, returns: ReturnShape) -> Self {
        self.returns = returns;
        self
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }
}
