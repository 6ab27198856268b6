//! Parameter direction

use dbcall_core::DeclaredType;
use serde::{Deserialize, Serialize};

use crate::ParameterDescriptor;

/// Parameter direction for routine calls
///
/// # Examples
///
/// ```
/// use dbcall_routines::Direction;
///
/// let input = Direction::In;
/// assert!(input.is_input());
/// assert!(!input.is_output());
///
/// let inout = Direction::InOut;
/// assert!(inout.is_input());
/// assert!(inout.is_output());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Value is passed to the routine
    #[default]
    In,
    /// Value is written by the routine
    Out,
    /// Value is passed in and may be overwritten
    InOut,
}

impl Direction {
    /// Check if this parameter consumes an input value
    pub fn is_input(&self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    /// Check if this parameter produces an output value
    pub fn is_output(&self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "in_out",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a parameter
///
/// An explicit direction on the descriptor wins. Without one the direction
/// is inferred from the output-only flag and the declared type.
pub fn resolve_direction(parameter: &ParameterDescriptor) -> Direction {
    parameter
        .direction
        .unwrap_or_else(|| infer_direction(parameter.output_only, &parameter.declared_type))
}

/// Infer a direction from metadata that has no explicit direction field
///
/// Output-only parameters are `Out`. Otherwise a by-reference type marks the
/// parameter as `InOut`, and everything else is `In`. Metadata producers
/// cannot tell reference and out parameters apart except through the type
/// marker, so the checks must stay in this order.
pub fn infer_direction(output_only: bool, declared_type: &DeclaredType) -> Direction {
    if output_only {
        Direction::Out
    } else if declared_type.is_by_ref() {
        Direction::InOut
    } else {
        Direction::In
    }
}
