//! Input/output helpers.
//!
//! - filtered record exports (CSV) (`export`)

pub mod export;

pub use export::*;
