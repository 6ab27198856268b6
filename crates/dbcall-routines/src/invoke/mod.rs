//! Routine invocation
//!
//! This module runs the full call pipeline: resolve the descriptor, build the
//! command, execute it through a `CommandExecutor`, and extract output values
//! aligned with the routine's parameters.

mod invoker;
mod output;
mod result;

#[cfg(test)]
mod tests;

pub use invoker::*;
pub use output::*;
pub use result::*;
