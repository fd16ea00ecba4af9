//! Raw OED location rows and the canonical exposure record

use std::borrow::Cow;

use rfoasis_core::{
    validation::{
        parsing::integral_float, parse_bool, parse_float, parse_integer,
    },
    CoverId, LineOfBusiness, Resolution,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of repeated `geogscheme{n}` / `geogname{n}` column pairs
pub const GEOG_SLOTS: usize = 5;

/// One raw location row keyed by lower-cased OED column name
///
/// Cells stay loosely typed; the accessors coerce numeric strings and
/// integral floats the way OED files are commonly written. Null cells and
/// blank strings read as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ExposureRow {
    cells: Map<String, Value>,
}

impl From<Map<String, Value>> for ExposureRow {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for ExposureRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = ExposureRow::default();
        for (column, value) in iter {
            row.insert(column.as_ref(), value);
        }
        row
    }
}

impl ExposureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        self.cells.insert(column.to_ascii_lowercase(), value.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Cell value, `None` for missing, null or blank cells
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self.cells.get(column)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            value => Some(value),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(value_as_integer)
    }

    pub fn float(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => parse_float(s),
            _ => None,
        }
    }

    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        match self.get(column)? {
            Value::String(s) => Some(Cow::Borrowed(s.trim())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn boolean(&self, column: &str) -> Option<bool> {
        let value = self.get(column)?;
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(_) => match value_as_integer(value)? {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            },
            Value::String(s) => parse_bool(s),
            _ => None,
        }
    }

    /// Location identifier, falling back to `locnumber`
    pub fn loc_id(&self) -> Option<String> {
        self.text("loc_id")
            .or_else(|| self.text("locnumber"))
            .map(Cow::into_owned)
    }

    /// Non-empty (scheme, value) pairs from the geography columns, in slot order
    pub fn geog_slots(&self) -> impl Iterator<Item = (Cow<'_, str>, &Value)> + '_ {
        (1..=GEOG_SLOTS).filter_map(move |slot| {
            let scheme = self.text(&format!("geogscheme{slot}"))?;
            let value = self.get(&format!("geogname{slot}"))?;
            Some((scheme, value))
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Integer from a JSON cell: integers, integral floats or numeric strings
pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_float)),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// Property bag attached to every canonical record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExposureProps {
    pub year_built: i32,
    pub static_motor: bool,
}

/// Canonical geocoded and classified exposure ("uni exposure")
///
/// Field names and numeric values are read by the external loss engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalExposure {
    pub loc_id: String,
    pub lob_id: u8,
    pub cover_id: u8,
    pub address_id: Option<String>,
    pub address_type: Option<u8>,
    pub med_id: Option<u32>,
    pub med_type: Option<u8>,
    pub zone_id: Option<u32>,
    pub zone_type: Option<u8>,
    pub lrg_id: Option<u32>,
    pub lrg_type: Option<u8>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub best_res: u8,
    pub state: Option<String>,
    pub country_code: String,
    pub props: ExposureProps,
}

impl CanonicalExposure {
    pub fn new(loc_id: String, lob: LineOfBusiness, cover: CoverId, country_code: String) -> Self {
        Self {
            loc_id,
            lob_id: lob.to_u8(),
            cover_id: cover.to_u8(),
            address_id: None,
            address_type: None,
            med_id: None,
            med_type: None,
            zone_id: None,
            zone_type: None,
            lrg_id: None,
            lrg_type: None,
            latitude: None,
            longitude: None,
            best_res: Resolution::Undefined.to_u8(),
            state: None,
            country_code,
            props: ExposureProps::default(),
        }
    }

    pub fn set_address(&mut self, address_id: &str) {
        self.address_id = Some(address_id.to_string());
        self.address_type = Some(Resolution::Address.to_u8());
    }

    pub fn set_postcode(&mut self, postcode: u32) {
        self.med_id = Some(postcode);
        self.med_type = Some(Resolution::Postcode.to_u8());
    }

    pub fn set_cresta(&mut self, zone: u32) {
        self.zone_id = Some(zone);
        self.zone_type = Some(Resolution::Cresta.to_u8());
    }

    pub fn set_ica_zone(&mut self, zone: u32) {
        self.lrg_id = Some(zone);
        self.lrg_type = Some(Resolution::IcaZone.to_u8());
    }

    pub fn set_lat_long(&mut self, lat: f64, lon: f64) {
        self.latitude = Some(lat);
        self.longitude = Some(lon);
    }

    pub fn has_lat_long(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    pub fn best_resolution(&self) -> Option<Resolution> {
        Resolution::from_u8(self.best_res)
    }

    pub fn is_motor(&self) -> bool {
        self.cover_id == CoverId::Motor.to_u8()
    }
}
