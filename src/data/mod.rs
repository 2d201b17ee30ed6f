//! Data acquisition: series catalog, BLS API client, and the multi-series
//! acquisition loop.

pub mod acquire;
pub mod bls;
pub mod catalog;

pub use acquire::{Acquisition, acquire, plan};
pub use bls::{BlsClient, RawObservation, SeriesSource};
pub use catalog::SeriesCatalog;
