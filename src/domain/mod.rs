//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - selectors (`View`, `Category`, `StateIndicator`, `FilterSelection`)
//! - series metadata and normalized observations (`SeriesDescriptor`, `DataPoint`)
//! - derived outputs (`FilterOptions`, `SeriesStats`)

pub mod types;

pub use types::*;
