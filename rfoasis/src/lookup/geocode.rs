//! Geocode attributes read from a raw row

use rfoasis_core::{
    validation::{sanitize_year_built, validate_lat_long, BoundingBox, Jurisdiction},
    LookupError, PostcodeSource,
};
use serde_json::Value;

use crate::{
    exposure::{value_as_integer, CanonicalExposure, ExposureProps, ExposureRow},
    reference_data::PostcodeTables,
};

/// Geography scheme tags understood in `geogscheme{n}` columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeogScheme {
    Gnaf,
    Ica,
    Cresta,
    Postcode,
}

impl GeogScheme {
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        [
            ("GNAF", GeogScheme::Gnaf),
            ("ICA", GeogScheme::Ica),
            ("CRO", GeogScheme::Cresta),
            ("PC4", GeogScheme::Postcode),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map(|(_, scheme)| scheme)
    }
}

/// Store one (scheme, value) slot, ignoring values of the wrong shape
pub fn apply_geog_name(record: &mut CanonicalExposure, scheme: GeogScheme, value: &Value) {
    match scheme {
        GeogScheme::Gnaf => {
            if let Value::String(s) = value {
                let s = s.trim();
                if !s.is_empty() {
                    record.set_address(s);
                }
            }
        }
        GeogScheme::Ica => {
            if let Some(zone) = zone_number(value) {
                record.set_ica_zone(zone);
            }
        }
        GeogScheme::Cresta => {
            if let Some(zone) = zone_number(value) {
                record.set_cresta(zone);
            }
        }
        GeogScheme::Postcode => {
            if let Some(postcode) = value_as_integer(value)
                .filter(|&code| code > 0)
                .and_then(|code| u32::try_from(code).ok())
            {
                record.set_postcode(postcode);
            }
        }
    }
}

/// ICA and cresta zones are numbered 1 to 49
fn zone_number(value: &Value) -> Option<u32> {
    value_as_integer(value)
        .filter(|zone| (1..50).contains(zone))
        .map(|zone| zone as u32)
}

/// Walk the geography slots in order; later slots overwrite earlier ones
pub fn scan_geog_schemes(record: &mut CanonicalExposure, row: &ExposureRow) {
    for (tag, value) in row.geog_slots() {
        if let Some(scheme) = GeogScheme::parse(&tag) {
            apply_geog_name(record, scheme, value);
        }
    }
}

/// Let a valid explicit postal code replace any scheme postcode
pub fn apply_postal_code(record: &mut CanonicalExposure, row: &ExposureRow, tables: &PostcodeTables) {
    if let Some(postcode) = row.integer("postalcode").and_then(|code| tables.resolve(code)) {
        record.set_postcode(postcode);
    }
}

/// Store a usable lat/long pair and fill a missing postcode from it
pub fn apply_lat_long<S: PostcodeSource>(
    record: &mut CanonicalExposure,
    row: &ExposureRow,
    bbox: &BoundingBox,
    source: Option<&S>,
) -> Result<(), LookupError> {
    let Some((lat, lon)) = validate_lat_long(row.float("latitude"), row.float("longitude"), bbox)? else {
        return Ok(());
    };
    record.set_lat_long(lat, lon);

    if record.med_id.is_none() {
        if let Some(postcode) = source.and_then(|source| source.get_postcode(Some(lon), Some(lat))) {
            record.set_postcode(postcode);
        }
    }
    Ok(())
}

/// Upper-case jurisdiction code, `None` for anything unrecognised
pub fn state_code(row: &ExposureRow) -> Option<String> {
    row.text("areacode")
        .and_then(|code| Jurisdiction::parse(&code))
        .map(|state| state.code().to_string())
}

pub fn props(row: &ExposureRow, current_year: i32, motor_marine: bool) -> ExposureProps {
    ExposureProps {
        year_built: sanitize_year_built(row.integer("yearbuilt"), current_year),
        static_motor: motor_marine || row.boolean("staticmotor").unwrap_or(false),
    }
}
