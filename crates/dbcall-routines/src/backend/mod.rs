//! Command execution backends
//!
//! `CommandExecutor` is the seam between routine calls and a live backend.
//! `SqlCommandExecutor` implements it on top of a `dbcall_core::Connection`,
//! rendering commands in the connection's dialect.

mod dialect;
mod executor;
mod sql;


pub use dialect::*;
pub use executor::*;
pub use sql::*;
