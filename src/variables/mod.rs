//! # Variable State
//!
//! Resolution of default values and the live per-template editing session.
//!
//! ## Modules
//!
//! - [`resolve`]: default value precedence and canonical value strings
//! - [`session`]: [`VariableSession`], the touched/untouched state machine

pub mod resolve;
pub mod session;

pub use resolve::{resolve_defaults, to_value_string};
pub use session::{VariableCell, VariableSession};
