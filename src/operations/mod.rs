//! Operations module
//!
//! One submodule per devkit command, plus shared command execution

pub mod commands;
pub mod generate;
pub mod init;
pub mod setup;
pub mod share;
pub mod snapshot;
