//! Reporting utilities: formatted terminal output for CLI commands.

pub mod format;

pub use format::*;
