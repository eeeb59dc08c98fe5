//! Sample catalog types and filtering

pub mod filter;
pub mod sample;

pub use filter::{filter_on_os, host_os};
pub use sample::{parse_index, Fields, Sample, Samples};
