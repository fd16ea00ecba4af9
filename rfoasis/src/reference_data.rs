//! Loading of keys reference data from a directory
//!
//! Required files build the [`PostcodeResolver`]:
//!
//! - `cellid_to_postcode.csv` (`cellid,postcode`), one row per candidate
//! - `postcode_grid.csv` (`cellid,latitude,longitude,size`), where `size` is
//!   the full cell width
//! - `postcode_boundaries.json`, a GeoJSON feature collection with a
//!   `postcode` property and Polygon or MultiPolygon geometry
//!
//! Optional files refine explicit postal codes:
//!
//! - `valid_postcodes.csv` (`postcode`)
//! - `postcode_concordance.csv` (`delivery_postcode,postcode`)

use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    config::QuadTreeConfig,
    error::{Result, RfError},
    exposure::value_as_integer,
    postcode::PostcodeResolver,
};

pub const CELL_POSTCODE_FILE: &str = "cellid_to_postcode.csv";
pub const POSTCODE_GRID_FILE: &str = "postcode_grid.csv";
pub const POSTCODE_BOUNDARY_FILE: &str = "postcode_boundaries.json";
pub const VALID_POSTCODES_FILE: &str = "valid_postcodes.csv";
pub const CONCORDANCE_FILE: &str = "postcode_concordance.csv";

/// Reference tables for explicit postal codes
#[derive(Debug, Clone, Default)]
pub struct PostcodeTables {
    /// Every postcode accepted from the `postalcode` column; any positive
    /// code is accepted when unset
    pub valid: Option<HashSet<u32>>,
    /// Delivery (PO box) postcode to its geographic postcode
    pub concordance: HashMap<u32, u32>,
}

impl PostcodeTables {
    /// Validate an explicit postal code and translate delivery postcodes
    pub fn resolve(&self, code: i64) -> Option<u32> {
        let code = u32::try_from(code).ok().filter(|&c| c > 0)?;
        if let Some(valid) = &self.valid {
            if !valid.contains(&code) {
                return None;
            }
        }
        Some(self.concordance.get(&code).copied().unwrap_or(code))
    }
}

/// Everything the keys lookup reads from the keys data directory
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub resolver: Option<PostcodeResolver>,
    pub postcodes: PostcodeTables,
}

impl ReferenceData {
    /// No resolver and no postcode tables
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every reference file from `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P, grid: &QuadTreeConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let resolver = load_resolver(dir, grid)?;

        let mut postcodes = PostcodeTables::default();
        let valid_path = dir.join(VALID_POSTCODES_FILE);
        if valid_path.is_file() {
            postcodes.valid = Some(load_valid_postcodes(&valid_path)?);
        }
        let concordance_path = dir.join(CONCORDANCE_FILE);
        if concordance_path.is_file() {
            postcodes.concordance = load_concordance(&concordance_path)?;
        }

        Ok(Self {
            resolver: Some(resolver),
            postcodes,
        })
    }
}

/// Build the postcode resolver from the three required files
pub fn load_resolver(dir: &Path, grid: &QuadTreeConfig) -> Result<PostcodeResolver> {
    let mut resolver = PostcodeResolver::new(grid.build()?);

    let path = dir.join(CELL_POSTCODE_FILE);
    let mut candidates = 0usize;
    read_csv(&path, &["cellid", "postcode"], |record, fields| {
        let postcode = parse_postcode(&path, record, fields[1])?;
        resolver.add_candidate(fields[0], postcode);
        candidates += 1;
        Ok(())
    })?;
    info!(
        "Loaded {candidates} postcode candidates for {} cells",
        resolver.cell_count()
    );

    let path = dir.join(POSTCODE_GRID_FILE);
    let (mut loaded, mut rejected) = (0usize, 0usize);
    read_csv(&path, &["cellid", "latitude", "longitude", "size"], |record, fields| {
        let lat = parse_f64(&path, record, "latitude", fields[1])?;
        let lon = parse_f64(&path, record, "longitude", fields[2])?;
        let width = parse_f64(&path, record, "size", fields[3])?;
        if resolver.load_cell(fields[0], lat, lon, width / 2.0) {
            loaded += 1;
        } else {
            rejected += 1;
            debug!("Cell {} at ({lat}, {lon}) width {width} is outside the grid", fields[0]);
        }
        Ok(())
    })?;
    if rejected > 0 {
        warn!("Skipped {rejected} cell definitions outside the quadtree grid");
    }
    if !resolver.tree().post_load_check() {
        warn!("Quadtree has loaded cells that were later subdivided");
    }
    info!("Loaded {loaded} grid cells ({} nodes)", resolver.tree().len());

    let path = dir.join(POSTCODE_BOUNDARY_FILE);
    let shapes = load_boundaries(&path)?;
    let parts: usize = shapes.iter().map(|(_, shape)| shape.0.len()).sum();
    for (postcode, shape) in shapes {
        resolver.add_boundaries(postcode, shape);
    }
    info!(
        "Loaded {parts} boundary polygons for {} postcodes",
        resolver.boundary_count()
    );

    Ok(resolver)
}

fn load_valid_postcodes(path: &Path) -> Result<HashSet<u32>> {
    let mut valid = HashSet::new();
    read_csv(path, &["postcode"], |record, fields| {
        valid.insert(parse_postcode(path, record, fields[0])?);
        Ok(())
    })?;
    info!("Loaded {} valid postcodes", valid.len());
    Ok(valid)
}

fn load_concordance(path: &Path) -> Result<HashMap<u32, u32>> {
    let mut concordance = HashMap::new();
    read_csv(path, &["delivery_postcode", "postcode"], |record, fields| {
        let delivery = parse_postcode(path, record, fields[0])?;
        let geographic = parse_postcode(path, record, fields[1])?;
        concordance.insert(delivery, geographic);
        Ok(())
    })?;
    info!("Loaded {} delivery postcode mappings", concordance.len());
    Ok(concordance)
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Map<String, Value>,
    geometry: Option<GeometryObject>,
}

#[derive(Deserialize)]
struct GeometryObject {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// Parse the GeoJSON boundary file into (postcode, shape) pairs, file order
pub fn load_boundaries(path: &Path) -> Result<Vec<(u32, MultiPolygon<f64>)>> {
    let reader = BufReader::new(File::open(path)?);
    let collection: FeatureCollection = serde_json::from_reader(reader)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| -> Result<(u32, MultiPolygon<f64>)> {
            let record = i + 1;
            let postcode = feature
                .properties
                .get("postcode")
                .and_then(value_as_integer)
                .and_then(|code| u32::try_from(code).ok())
                .ok_or_else(|| RfError::reference(path, record, "missing or invalid postcode property"))?;
            let geometry = feature
                .geometry
                .ok_or_else(|| RfError::reference(path, record, "feature has no geometry"))?;
            let shape = to_multi_polygon(geometry)
                .map_err(|reason| RfError::reference(path, record, reason))?;
            Ok((postcode, shape))
        })
        .collect()
}

type Rings = Vec<Vec<Vec<f64>>>;

fn to_multi_polygon(geometry: GeometryObject) -> std::result::Result<MultiPolygon<f64>, String> {
    let polygons = match geometry.kind.as_str() {
        "Polygon" => {
            let rings: Rings = serde_json::from_value(geometry.coordinates).map_err(|e| e.to_string())?;
            vec![to_polygon(rings)?]
        }
        "MultiPolygon" => {
            let parts: Vec<Rings> =
                serde_json::from_value(geometry.coordinates).map_err(|e| e.to_string())?;
            parts
                .into_iter()
                .map(to_polygon)
                .collect::<std::result::Result<Vec<_>, String>>()?
        }
        other => return Err(format!("unsupported geometry type {other}")),
    };
    Ok(MultiPolygon(polygons))
}

fn to_polygon(rings: Rings) -> std::result::Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(to_ring);
    let exterior = rings.next().ok_or("polygon has no rings")??;
    let interiors = rings.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_ring(positions: Vec<Vec<f64>>) -> std::result::Result<LineString<f64>, String> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err("position needs at least two values".to_string()),
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Stream a headed CSV file, passing the named columns of each row in order
///
/// `on_row` receives the 1-based line number and the selected fields.
/// Blank lines are skipped; column names match case-insensitively. Fields
/// may be double-quoted, with `""` for a literal quote. Quoted fields do not
/// span lines.
pub fn read_csv<F>(path: &Path, columns: &[&str], mut on_row: F) -> Result<usize>
where
    F: FnMut(usize, &[&str]) -> Result<()>,
{
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(RfError::reference(path, 1, "missing header row")),
    };
    let names: Vec<String> = split_fields(header.trim_start_matches('\u{feff}'))
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();
    let indices = columns
        .iter()
        .map(|column| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| RfError::reference(path, 1, format!("missing column '{column}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = 0;
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = i + 2;
        let fields = split_fields(&line);

        let selected = indices
            .iter()
            .map(|&idx| fields.get(idx).map(|field| &**field))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| RfError::reference(path, record, "row has too few fields"))?;
        on_row(record, &selected)?;
        rows += 1;
    }
    Ok(rows)
}

fn split_fields(line: &str) -> Vec<Cow<'_, str>> {
    let mut fields = Vec::new();
    let mut rest = line;
    loop {
        let trimmed = rest.trim_start();
        let (field, tail) = match trimmed.strip_prefix('"') {
            Some(quoted) => split_quoted(quoted),
            None => match trimmed.find(',') {
                Some(end) => (Cow::Borrowed(trimmed[..end].trim()), Some(&trimmed[end + 1..])),
                None => (Cow::Borrowed(trimmed.trim()), None),
            },
        };
        fields.push(field);
        match tail {
            Some(tail) => rest = tail,
            None => return fields,
        }
    }
}

/// Body of a quoted field and the text after its trailing comma
///
/// An unterminated quote takes the rest of the line.
fn split_quoted(body: &str) -> (Cow<'_, str>, Option<&str>) {
    let mut value = Cow::Borrowed("");
    let mut rest = body;
    loop {
        let Some(quote) = rest.find('"') else {
            append(&mut value, rest);
            return (value, None);
        };
        let after = &rest[quote + 1..];
        match after.strip_prefix('"') {
            Some(next) => {
                value.to_mut().push_str(&rest[..=quote]);
                rest = next;
            }
            None => {
                append(&mut value, &rest[..quote]);
                return (value, after.find(',').map(|comma| &after[comma + 1..]));
            }
        }
    }
}

fn append<'a>(value: &mut Cow<'a, str>, text: &'a str) {
    if value.is_empty() {
        *value = Cow::Borrowed(text);
    } else {
        value.to_mut().push_str(text);
    }
}

fn parse_postcode(path: &Path, record: usize, field: &str) -> Result<u32> {
    rfoasis_core::validation::parse_integer(field)
        .and_then(|code| u32::try_from(code).ok())
        .ok_or_else(|| RfError::reference(path, record, format!("invalid postcode '{field}'")))
}

fn parse_f64(path: &Path, record: usize, column: &str, field: &str) -> Result<f64> {
    rfoasis_core::validation::parse_float(field)
        .ok_or_else(|| RfError::reference(path, record, format!("invalid {column} '{field}'")))
}
