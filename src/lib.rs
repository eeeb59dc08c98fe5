//! sample-mirror - local mirror of a remote sample catalog
//!
//! Keeps per-language sample indexes in sync with a remote catalog and
//! retrieves sample archives either in bulk, with bounded retries and cache
//! poisoning on failure, or lazily one at a time.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod mirror;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod testing;

pub use error::{MirrorError, MirrorResult};
pub use mirror::{Mirror, MirrorOptions};
