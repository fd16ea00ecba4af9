//! Binary format definitions for the grouped loss stream
//!
//! Pure wire layout: header word encoding, key and sample records.
//! Reading and writing to sinks lives in the std crate.

pub mod constants;
pub mod header;
pub mod record;

pub use header::{StreamHeader, StreamKind};
pub use record::{LossRecord, SampleLoss, StreamKey};
