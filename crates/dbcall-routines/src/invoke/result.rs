//! Call results

use dbcall_core::{QueryResult, Value};

use crate::OutputValue;

/// Result of invoking a routine
#[derive(Debug, Clone)]
pub enum CallResult {
    /// The routine returned a result set
    Tabular {
        data: QueryResult,
        outputs: Vec<OutputValue>,
    },
    /// The routine returned a single value
    Scalar {
        value: Value,
        outputs: Vec<OutputValue>,
    },
}

impl CallResult {
    /// Output values, one per routine parameter
    pub fn outputs(&self) -> &[OutputValue] {
        match self {
            CallResult::Tabular { outputs, .. } | CallResult::Scalar { outputs, .. } => outputs,
        }
    }

    /// Output value of the parameter at `index`
    pub fn output(&self, index: usize) -> Option<&OutputValue> {
        self.outputs().get(index)
    }

    /// Get the result set (tabular calls only)
    pub fn table(&self) -> Option<&QueryResult> {
        match self {
            CallResult::Tabular { data, .. } => Some(data),
            CallResult::Scalar { .. } => None,
        }
    }

    /// Get the scalar value (scalar calls only)
    pub fn scalar(&self) -> Option<&Value> {
        match self {
            CallResult::Scalar { value, .. } => Some(value),
            CallResult::Tabular { .. } => None,
        }
    }

    /// Take the output values
    pub fn into_outputs(self) -> Vec<OutputValue> {
        match self {
            CallResult::Tabular { outputs, .. } | CallResult::Scalar { outputs, .. } => outputs,
        }
    }
}
