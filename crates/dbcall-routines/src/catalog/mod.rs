//! Routine metadata
//!
//! This module maps logical call identifiers to immutable routine
//! descriptors: the mapped backend name, whether the routine is composable,
//! its return shape and its formal parameters.

mod descriptor;
mod registry;

#[cfg(test)]
mod tests;

pub use descriptor::*;
pub use registry::*;
