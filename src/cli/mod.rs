//! Command-line interface module
//!
//! Argument parsing and interactive prompting

pub mod args;
pub mod prompt;

pub use args::*;
