//! Lookup and grid configuration
//!
//! Both configurations are plain serde structs with defaults matching the
//! Australian hail model. A model settings file may override any subset of
//! fields; the `RF_MODEL_NAME` and `RF_DEFAULT_COUNTRY` environment variables
//! take precedence over the file.

use std::{env, fs, path::Path};

use chrono::Datelike;
use rfoasis_core::{
    validation::BoundingBox, CodeRange, OccupancyRange, PerilModel, QuadTree,
    DEFAULT_OCCUPANCY_TABLE,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RfError};

/// Environment variable overriding [`LookupConfig::model_name`]
pub const ENV_MODEL_NAME: &str = "RF_MODEL_NAME";
/// Environment variable overriding [`LookupConfig::default_country`]
pub const ENV_DEFAULT_COUNTRY: &str = "RF_DEFAULT_COUNTRY";

/// Numbering used for occupancy code failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyErrorScheme {
    /// Unsupported codes are not modelled (230), malformed codes fail (123)
    #[default]
    Current,
    /// Unsupported codes fail with 123, malformed codes with 124
    Legacy,
}

/// Configuration for the keys lookup engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Peril model name from the catalogue, e.g. `hailaus`
    pub model_name: String,
    /// Country code stored when the row has none
    pub default_country: String,
    /// Lat/long outside this box fail the lookup
    pub bounding_box: BoundingBox,
    pub occupancy_table: Vec<OccupancyRange>,
    pub motor_construction: CodeRange,
    /// Sub-range of motor codes always flagged as static motor
    pub motor_marine_construction: CodeRange,
    pub unsupported_construction: CodeRange,
    /// Map "other" coverage to motor cover instead of reporting it as not modelled
    pub motor_other_coverage: bool,
    pub occupancy_errors: OccupancyErrorScheme,
    /// Year used to sanitise year built; the current year when unset
    pub reference_year: Option<i32>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            model_name: "hailaus".to_string(),
            default_country: "au".to_string(),
            bounding_box: BoundingBox::AUSTRALIA,
            occupancy_table: DEFAULT_OCCUPANCY_TABLE.to_vec(),
            motor_construction: CodeRange::MOTOR,
            motor_marine_construction: CodeRange::MOTOR_MARINE,
            unsupported_construction: CodeRange::UNSUPPORTED_CONSTRUCTION,
            motor_other_coverage: false,
            occupancy_errors: OccupancyErrorScheme::Current,
            reference_year: None,
        }
    }
}

impl LookupConfig {
    /// Config for a named catalogue model, country taken from the catalogue
    pub fn for_model(model_name: &str) -> Result<Self> {
        let model = find_model(model_name)?;
        Ok(Self::default()
            .with_model_name(model.name)
            .with_default_country(model.country))
    }

    /// Load a model settings file and apply environment overrides
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let mut config: LookupConfig = serde_json::from_str(&text)?;
        config.apply_environment_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `RF_MODEL_NAME` and `RF_DEFAULT_COUNTRY`
    pub fn apply_environment_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var(ENV_MODEL_NAME).filter(|v| !v.trim().is_empty()) {
            self.model_name = value.trim().to_lowercase();
        }
        if let Some(value) = var(ENV_DEFAULT_COUNTRY).filter(|v| !v.trim().is_empty()) {
            self.default_country = value.trim().to_lowercase();
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        find_model(&self.model_name)?;

        if self.default_country.is_empty() {
            return Err(RfError::Config("default_country must not be empty".into()));
        }
        let bbox = &self.bounding_box;
        if !(bbox.min_lat < bbox.max_lat && bbox.min_lon < bbox.max_lon) {
            return Err(RfError::Config(format!("empty bounding box {bbox:?}")));
        }
        if self.occupancy_table.iter().any(|range| range.codes.is_empty()) {
            return Err(RfError::Config("occupancy range with start > end".into()));
        }
        for (name, range) in [
            ("motor_construction", &self.motor_construction),
            ("motor_marine_construction", &self.motor_marine_construction),
            ("unsupported_construction", &self.unsupported_construction),
        ] {
            if range.is_empty() {
                return Err(RfError::Config(format!("{name} has start > end")));
            }
        }
        Ok(())
    }

    /// Catalogue entry for the configured model
    pub fn peril_model(&self) -> Result<&'static PerilModel> {
        find_model(&self.model_name)
    }

    /// Year used for year-built sanitisation
    pub fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn with_occupancy_table(mut self, table: Vec<OccupancyRange>) -> Self {
        self.occupancy_table = table;
        self
    }

    pub fn with_motor_other_coverage(mut self, enabled: bool) -> Self {
        self.motor_other_coverage = enabled;
        self
    }

    pub fn with_occupancy_errors(mut self, scheme: OccupancyErrorScheme) -> Self {
        self.occupancy_errors = scheme;
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }
}

fn find_model(name: &str) -> Result<&'static PerilModel> {
    PerilModel::find(name).ok_or_else(|| RfError::Config(format!("unknown peril model '{name}'")))
}

/// Geometry of the quadtree root grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    pub lat_dim: usize,
    pub lon_dim: usize,
    /// Centroid latitude of the south-west root cell
    pub min_lat: f64,
    /// Centroid longitude of the south-west root cell
    pub min_lon: f64,
    /// Half-size of each root cell in degrees
    pub base_size: f64,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            lat_dim: 8,
            lon_dim: 8,
            min_lat: -44.36151598,
            min_lon: 115.35990092,
            base_size: 2.56,
        }
    }
}

impl QuadTreeConfig {
    pub fn with_dims(mut self, lat_dim: usize, lon_dim: usize) -> Self {
        self.lat_dim = lat_dim;
        self.lon_dim = lon_dim;
        self
    }

    pub fn with_origin(mut self, min_lat: f64, min_lon: f64) -> Self {
        self.min_lat = min_lat;
        self.min_lon = min_lon;
        self
    }

    pub fn with_base_size(mut self, base_size: f64) -> Self {
        self.base_size = base_size;
        self
    }

    /// Build an empty tree with this geometry
    pub fn build(&self) -> Result<QuadTree> {
        if self.lat_dim == 0 || self.lon_dim == 0 {
            return Err(RfError::Config("quadtree needs at least one root cell".into()));
        }
        if !(self.base_size.is_finite() && self.base_size > 0.0) {
            return Err(RfError::Config(format!(
                "quadtree base size must be positive, got {}",
                self.base_size
            )));
        }
        Ok(QuadTree::new(
            self.lat_dim,
            self.lon_dim,
            self.min_lat,
            self.min_lon,
            self.base_size,
        ))
    }
}
