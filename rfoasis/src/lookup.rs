//! Keys lookup: raw OED rows to canonical exposure records
//!
//! [`KeysLookup`] runs every (row, coverage) pair through a fixed pipeline:
//! required fields and covered perils, the coverage insured value, line of
//! business, motor and cover classification, geography schemes, postal code,
//! lat/long with postcode fallback, best-resolution tagging, state, property
//! bag and the final consistency checks. Each step may end the pair with a
//! typed [`LookupError`]; errors never abort the batch.

pub mod cascade;
pub mod classify;
pub mod geocode;

use std::path::Path;

use rayon::prelude::*;
use rfoasis_core::{
    validation::parse_peril_codes, CoverId, ExposureLookup, LineOfBusiness, LookupError,
    LookupOutcome, LookupStatus, OedCoverage, PerilModel, PostcodeSource,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{LookupConfig, QuadTreeConfig},
    error::Result,
    exposure::{CanonicalExposure, ExposureRow},
    postcode::PostcodeResolver,
    reference_data::{PostcodeTables, ReferenceData},
};

pub use cascade::best_resolution;

/// One row of the keys output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysRecord {
    pub loc_id: String,
    /// OED peril id of the configured model
    pub peril_id: u32,
    /// OED coverage type
    pub coverage_type: u8,
    /// Canonical record as JSON, present on success only
    pub model_data: Option<String>,
    pub status: LookupStatus,
    pub message: String,
}

/// Geocode resolution engine for one peril model
///
/// Read-only once constructed; a single instance can be shared across
/// threads when the postcode source is `Sync`.
#[derive(Debug, Clone)]
pub struct KeysLookup<S = PostcodeResolver> {
    config: LookupConfig,
    model: &'static PerilModel,
    current_year: i32,
    postcodes: PostcodeTables,
    source: Option<S>,
}

impl KeysLookup<PostcodeResolver> {
    /// Engine over loaded reference data
    pub fn new(config: LookupConfig, reference: ReferenceData) -> Result<Self> {
        Self::with_source(config, reference.resolver, reference.postcodes)
    }

    /// Engine without reference data: no postcode fallback, no postcode
    /// validation
    pub fn without_reference_data(config: LookupConfig) -> Result<Self> {
        Self::new(config, ReferenceData::empty())
    }

    /// Load the keys data directory and build the engine
    pub fn from_keys_dir<P: AsRef<Path>>(
        keys_dir: P,
        config: LookupConfig,
        grid: &QuadTreeConfig,
    ) -> Result<Self> {
        let reference = ReferenceData::load_dir(keys_dir, grid)?;
        Self::new(config, reference)
    }
}

impl<S: PostcodeSource> KeysLookup<S> {
    /// Engine over any postcode source
    pub fn with_source(config: LookupConfig, source: Option<S>, postcodes: PostcodeTables) -> Result<Self> {
        config.validate()?;
        let model = config.peril_model()?;
        let current_year = config.current_year();
        Ok(Self {
            config,
            model,
            current_year,
            postcodes,
            source,
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn model(&self) -> &'static PerilModel {
        self.model
    }

    /// OED peril id reported in keys records
    pub fn peril_id(&self) -> u32 {
        self.model.peril.bits()
    }

    /// Build the canonical record for a pair, ignoring insured values
    pub fn create_uni_exposure(
        &self,
        row: &ExposureRow,
        coverage: OedCoverage,
    ) -> std::result::Result<CanonicalExposure, LookupError> {
        let loc_id = self.check_required(row)?;
        self.build(row, coverage, loc_id)
    }

    /// Full pipeline for a pair; `Ok(None)` when the coverage has no
    /// positive insured value
    pub fn try_resolve(
        &self,
        row: &ExposureRow,
        coverage: OedCoverage,
    ) -> std::result::Result<Option<CanonicalExposure>, LookupError> {
        let loc_id = self.check_required(row)?;

        if !row.float(coverage.tiv_column()).is_some_and(|tiv| tiv > 0.0) {
            return Ok(None);
        }
        if coverage == OedCoverage::Other && !self.config.motor_other_coverage {
            return Err(LookupError::MOTOR_COVERAGE_MISMATCH);
        }
        self.build(row, coverage, loc_id).map(Some)
    }

    /// Covered perils and location id; returns the location id
    fn check_required(&self, row: &ExposureRow) -> std::result::Result<String, LookupError> {
        let perils = row
            .text("locperilscovered")
            .ok_or(LookupError::MISSING_PERILS_COVERED)?;
        let loc_id = row.loc_id().ok_or(LookupError::MISSING_LOCATION_ID)?;
        if !parse_peril_codes(&perils).contains(self.model.peril) {
            return Err(LookupError::UNSUPPORTED_PERIL);
        }
        Ok(loc_id)
    }

    fn build(
        &self,
        row: &ExposureRow,
        coverage: OedCoverage,
        loc_id: String,
    ) -> std::result::Result<CanonicalExposure, LookupError> {
        let config = &self.config;

        let lob = classify::line_of_business(row, config)?;
        let construction = classify::construction_code(row);
        let is_motor = classify::motor_flag(construction, coverage, config)?;
        let cover = classify::cover_id(coverage, is_motor)?;
        let country = classify::country_code(row, config);

        let mut record = CanonicalExposure::new(loc_id, lob, cover, country);
        geocode::scan_geog_schemes(&mut record, row);
        geocode::apply_postal_code(&mut record, row, &self.postcodes);
        geocode::apply_lat_long(&mut record, row, &config.bounding_box, self.source.as_ref())?;

        if let Some(resolution) = best_resolution(&record) {
            record.best_res = resolution.to_u8();
        }
        record.state = geocode::state_code(row);

        let motor_marine = construction.is_some_and(|code| config.motor_marine_construction.contains(code));
        record.props = geocode::props(row, self.current_year, motor_marine);

        if !cascade::is_geocoded(&record) {
            return Err(LookupError::INCOMPLETE_GEOCODE);
        }
        if lob == LineOfBusiness::Residential && cover == CoverId::BusinessInterruption {
            return Err(LookupError::RESIDENTIAL_BI);
        }
        if cover != CoverId::Motor && is_motor {
            return Err(LookupError::MOTOR_COVERAGE_MISMATCH);
        }
        Ok(record)
    }

    /// Keys record for a pair, `None` when the pair is skipped
    pub fn process_location(&self, row: &ExposureRow, coverage: OedCoverage) -> Option<KeysRecord> {
        let outcome = self.resolve(row, coverage);
        let loc_id = row.loc_id().unwrap_or_default();
        let (model_data, status, message) = match outcome {
            LookupOutcome::Skip => return None,
            LookupOutcome::Success(record) => match serde_json::to_string(&record) {
                Ok(json) => (Some(json), LookupStatus::Success, "OK".to_string()),
                Err(e) => {
                    warn!("Could not serialise exposure for location {loc_id}: {e}");
                    (None, LookupStatus::Fail, e.to_string())
                }
            },
            LookupOutcome::Fail(error) => {
                debug!("Location {loc_id} coverage {} failed: {error}", coverage.to_u8());
                (None, LookupStatus::Fail, error.to_string())
            }
            LookupOutcome::NotModelled(error) => {
                debug!("Location {loc_id} coverage {} not modelled: {error}", coverage.to_u8());
                (None, LookupStatus::NotModelled, error.to_string())
            }
        };

        Some(KeysRecord {
            loc_id,
            peril_id: self.peril_id(),
            coverage_type: coverage.to_u8(),
            model_data,
            status,
            message,
        })
    }

    /// Every row crossed with every coverage, row-major
    pub fn process_locations<'a, I>(&self, rows: I) -> Vec<KeysRecord>
    where
        I: IntoIterator<Item = &'a ExposureRow>,
    {
        rows.into_iter()
            .flat_map(|row| {
                self.coverages()
                    .iter()
                    .filter_map(move |&coverage| self.process_location(row, coverage))
            })
            .collect()
    }

    /// Parallel [`process_locations`](Self::process_locations) with the same output order
    pub fn par_process_locations(&self, rows: &[ExposureRow]) -> Vec<KeysRecord>
    where
        S: Sync,
    {
        rows.par_iter()
            .flat_map_iter(|row| {
                self.coverages()
                    .iter()
                    .filter_map(move |&coverage| self.process_location(row, coverage))
            })
            .collect()
    }
}

impl<S: PostcodeSource> ExposureLookup for KeysLookup<S> {
    type Row = ExposureRow;
    type Record = CanonicalExposure;

    fn resolve(&self, row: &ExposureRow, coverage: OedCoverage) -> LookupOutcome<CanonicalExposure> {
        LookupOutcome::from_result(self.try_resolve(row, coverage))
    }
}
