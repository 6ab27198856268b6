//! Output parameter extraction

use dbcall_core::{Value, ValueConverter, ValueType};

use crate::{BackendParameter, CallError, ConversionPolicy, ParameterDescriptor, Result};

/// One slot of a call's output values
///
/// There is exactly one slot per routine parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    /// The parameter was input-only; there is nothing to read
    Unused,
    /// The value written by the backend, coerced to the declared type
    Value(Value),
    /// The backend value could not be coerced to the declared type
    ConversionFailed {
        raw: Value,
        target: ValueType,
        reason: String,
    },
}

impl OutputValue {
    /// Check if this slot belongs to an input-only parameter
    pub fn is_unused(&self) -> bool {
        matches!(self, OutputValue::Unused)
    }

    /// Get the coerced value, if the slot has one
    pub fn value(&self) -> Option<&Value> {
        match self {
            OutputValue::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Take the coerced value, if the slot has one
    pub fn into_value(self) -> Option<Value> {
        match self {
            OutputValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputValue::Unused => write!(f, "unused"),
            OutputValue::Value(value) => write!(f, "{}", value),
            OutputValue::ConversionFailed { raw, target, .. } => {
                write!(f, "<{} not convertible to {}>", raw, target)
            }
        }
    }
}

/// Collect the output values of an executed command
///
/// `parameters` and `backend_parameters` are aligned by position. Input-only
/// parameters yield `Unused`; every other parameter's backend value is
/// converted to the declared type (by-reference marker stripped). A failed
/// conversion is tagged or turned into `CallError::Conversion` depending on
/// `policy`; either way the result has one entry per parameter.
pub fn extract_outputs(
    parameters: &[ParameterDescriptor],
    backend_parameters: &[BackendParameter],
    converter: &dyn ValueConverter,
    policy: ConversionPolicy,
) -> Result<Vec<OutputValue>> {
    if parameters.len() != backend_parameters.len() {
        return Err(CallError::InvalidCall(format!(
            "{} parameter descriptors but {} backend parameters",
            parameters.len(),
            backend_parameters.len()
        )));
    }

    let mut outputs = Vec::with_capacity(parameters.len());
    for (descriptor, parameter) in parameters.iter().zip(backend_parameters) {
        if !parameter.direction.is_output() {
            outputs.push(OutputValue::Unused);
            continue;
        }

        let target = descriptor.declared_type.value_type();
        match converter.convert(&parameter.value, target) {
            Ok(value) => outputs.push(OutputValue::Value(value)),
            Err(err) => match policy {
                ConversionPolicy::Tag => {
                    tracing::warn!(
                        parameter = %descriptor.name,
                        target = %target,
                        error = %err,
                        "output parameter conversion failed"
                    );
                    outputs.push(OutputValue::ConversionFailed {
                        raw: err.value,
                        target: err.target,
                        reason: err.reason,
                    });
                }
                ConversionPolicy::Fail => {
                    return Err(CallError::Conversion {
                        parameter: descriptor.name.clone(),
                        source: err,
                    });
                }
            },
        }
    }
    Ok(outputs)
}
