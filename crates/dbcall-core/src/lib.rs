//! dbcall Core - value model and backend abstractions
//!
//! This crate provides the types every other dbcall crate depends on:
//!
//! - `Connection` - Trait for an already-open database connection
//! - `Value`, `Row`, `QueryResult` - Values and result containers
//! - `ValueType`, `DeclaredType` - Declared types of routine parameters
//! - `ValueConverter` - The value conversion primitive used for output coercion

mod connection;
mod convert;
mod error;
mod types;
mod value_type;

pub use connection::*;
pub use convert::*;
pub use error::*;
pub use types::*;
pub use value_type::*;
