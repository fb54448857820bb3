//! Shared helpers for paths and file output

pub mod fs;
pub mod path;
