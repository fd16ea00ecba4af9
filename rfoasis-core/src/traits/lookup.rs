//! Lookup capability traits

use crate::OedCoverage;

use super::outcome::LookupOutcome;

/// Turns one raw exposure row and a coverage into a canonical record
///
/// Implementations hold only read-only state, so one instance can serve
/// many rows concurrently.
pub trait ExposureLookup {
    /// Raw row representation
    type Row: ?Sized;

    /// Canonical record produced on success
    type Record;

    /// Resolve a single (row, coverage) pair
    fn resolve(&self, row: &Self::Row, coverage: OedCoverage) -> LookupOutcome<Self::Record>;

    /// Coverages every row is crossed with
    fn coverages(&self) -> &[OedCoverage] {
        &OedCoverage::ALL
    }
}

/// Anything able to name the postcode containing a point
pub trait PostcodeSource {
    /// Postcode at (lon, lat); `None` when either coordinate is missing or
    /// no boundary contains the point
    fn get_postcode(&self, lon: Option<f64>, lat: Option<f64>) -> Option<u32>;
}

impl<T: PostcodeSource + ?Sized> PostcodeSource for &T {
    fn get_postcode(&self, lon: Option<f64>, lat: Option<f64>) -> Option<u32> {
        (**self).get_postcode(lon, lat)
    }
}
