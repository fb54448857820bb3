//! Error handling module
//!
//! Defines the error taxonomy and the exit code of each class

pub mod types;

pub use types::*;
