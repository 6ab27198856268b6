//! dbcall Routines - stored routine invocation
//!
//! This crate turns a call identifier plus ordered input values into a
//! backend call and marshals the results back:
//! - Routine catalogs and descriptors
//! - Parameter direction resolution
//! - Command building for stored procedures and composable functions
//! - Execution against a backend, tabular or scalar
//! - Output parameter extraction and coercion

pub mod backend;
pub mod call;
pub mod catalog;
mod config;
mod error;
pub mod invoke;

pub use backend::*;
pub use call::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use invoke::*;
