//! Best-resolution tagging
//!
//! Checks run in a fixed order and every matching check overwrites the tag
//! set before it, so the last match wins. Lat/long therefore outranks a
//! street address, which outranks postcode, cresta zone and ICA zone.

use rfoasis_core::{validation::is_valid_gnaf, Resolution};

use crate::exposure::CanonicalExposure;

type Check = fn(&CanonicalExposure) -> bool;

fn has_ica_zone(record: &CanonicalExposure) -> bool {
    record.lrg_id.is_some()
}

fn has_cresta(record: &CanonicalExposure) -> bool {
    record.zone_id.is_some()
}

fn has_postcode(record: &CanonicalExposure) -> bool {
    record.med_id.is_some()
}

/// Address ids only count when they have the GNAF shape
pub fn has_valid_address(record: &CanonicalExposure) -> bool {
    record.address_id.as_deref().is_some_and(is_valid_gnaf)
}

fn has_lat_long(record: &CanonicalExposure) -> bool {
    record.has_lat_long()
}

/// Ordered checks, lowest effective priority first
pub const RESOLUTION_CASCADE: [(Check, Resolution); 5] = [
    (has_ica_zone, Resolution::IcaZone),
    (has_cresta, Resolution::Cresta),
    (has_postcode, Resolution::Postcode),
    (has_valid_address, Resolution::Address),
    (has_lat_long, Resolution::LatLong),
];

/// Resolution of the last matching check, `None` if nothing matches
pub fn best_resolution(record: &CanonicalExposure) -> Option<Resolution> {
    RESOLUTION_CASCADE
        .iter()
        .filter(|(check, _)| check(record))
        .map(|&(_, resolution)| resolution)
        .last()
}

/// Whether any geocode attribute usable by the loss engine is present
pub fn is_geocoded(record: &CanonicalExposure) -> bool {
    best_resolution(record).is_some()
}
