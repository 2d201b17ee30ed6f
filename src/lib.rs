//! `bls-explorer` library crate.
//!
//! The binary (`bls`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or touching the network
//! - the CLI and the TUI share one acquisition/filter/statistics pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod logging;
pub mod report;
pub mod stats;
pub mod tui;
