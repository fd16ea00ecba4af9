//! RF Oasis - keys lookup and loss stream output for the Oasis complex-model bridge
//!
//! This library turns raw OED location rows into canonical geocoded exposure
//! records and serialises per-sample losses into the grouped binary stream
//! read by downstream Oasis tools.
//!
//! ## Architecture
//!
//! - **rfoasis-core**: wire format, quadtree, enumerations and validators (no I/O)
//! - **rfoasis**: reference data loading, postcode resolution, the keys
//!   lookup engine, stream writer/reader, configuration and logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rfoasis::{ExposureLookup, ExposureRow, KeysLookup, LookupConfig, OedCoverage, QuadTreeConfig};
//!
//! fn example() -> rfoasis::Result<()> {
//!     let config = LookupConfig::for_model("hailaus")?;
//!     let lookup = KeysLookup::from_keys_dir("keys_data", config, &QuadTreeConfig::default())?;
//!
//!     let row = ExposureRow::new()
//!         .with("locperilscovered", "WW1;XX1")
//!         .with("loc_id", "L1")
//!         .with("latitude", -33.8688)
//!         .with("longitude", 151.2093)
//!         .with("buildingtiv", 250_000.0);
//!     let outcome = lookup.resolve(&row, OedCoverage::Buildings);
//!     if let Some(record) = outcome.record() {
//!         println!("postcode {:?}, best_res {}", record.med_id, record.best_res);
//!     }
//!     Ok(())
//! }
//! ```

pub use rfoasis_core::{
    // Capabilities
    ExposureLookup, LookupOutcome, LookupStatus, PostcodeSource,
    // Format definitions
    LossRecord, SampleLoss, StreamHeader, StreamKey, StreamKind,
    // Model enumerations
    CoverId, LineOfBusiness, OedCoverage, OedPeril, PerilModel, PerilSet, Resolution,
    // Errors
    LookupError, LookupErrorKind, StreamError,
    // Spatial index
    GridCell, NodeId, QuadTree,
};

pub mod config;
pub mod error;
pub mod exposure;
pub mod logging;
pub mod lookup;
pub mod postcode;
pub mod reference_data;
pub mod stream;

pub use config::{LookupConfig, OccupancyErrorScheme, QuadTreeConfig};
pub use error::{Result, RfError};
pub use exposure::{CanonicalExposure, ExposureProps, ExposureRow};
pub use lookup::{KeysLookup, KeysRecord};
pub use postcode::PostcodeResolver;
pub use reference_data::{PostcodeTables, ReferenceData};
pub use stream::{EventBatch, LossStream, LossStreamReader, LossStreamWriter};

#[cfg(feature = "mmap")]
pub use stream::MappedLossStream;
