//! Call construction
//!
//! This module resolves parameter directions and builds the command text and
//! bind parameters for stored procedures and composable functions.

mod builder;
mod direction;


pub use builder::*;
pub use direction::*;
