//! Canonical enumerations shared with the downstream loss engine
//!
//! Numeric values in this module are cross-system identifiers. They are
//! written verbatim into canonical exposure records and must not change.

pub mod coverage;
pub mod lob;
pub mod peril;
pub mod resolution;

pub use coverage::{CoverId, OedCoverage};
pub use lob::{classify_occupancy, CodeRange, LineOfBusiness, OccupancyRange, DEFAULT_OCCUPANCY_TABLE};
pub use peril::{OedPeril, PerilModel, PerilSet, RfPeril};
pub use resolution::Resolution;
