//! Utility types and functions.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`logging`] - Verbosity flags and tracing setup for the binaries

mod error;
pub mod logging;

pub use error::*;
