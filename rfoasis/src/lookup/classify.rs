//! Line of business, motor and cover classification

use rfoasis_core::{
    classify_occupancy, CoverId, LineOfBusiness, LookupError, OedCoverage,
};
use serde_json::Value;

use crate::{
    config::{LookupConfig, OccupancyErrorScheme},
    exposure::{value_as_integer, ExposureRow},
};

/// Classify the occupancy code; an absent code is residential
pub fn line_of_business(row: &ExposureRow, config: &LookupConfig) -> Result<LineOfBusiness, LookupError> {
    let Some(value) = row.get("occupancycode") else {
        return Ok(LineOfBusiness::Residential);
    };

    let (unsupported, malformed) = match config.occupancy_errors {
        OccupancyErrorScheme::Current => {
            (LookupError::UNSUPPORTED_OCCUPANCY, LookupError::MALFORMED_OCCUPANCY)
        }
        OccupancyErrorScheme::Legacy => (
            LookupError::LEGACY_UNSUPPORTED_OCCUPANCY,
            LookupError::LEGACY_MALFORMED_OCCUPANCY,
        ),
    };

    let code = match value {
        Value::Bool(_) => return Err(malformed),
        value => value_as_integer(value).ok_or(malformed)?,
    };
    classify_occupancy(code, &config.occupancy_table).ok_or(unsupported)
}

/// Construction code, `None` when absent or not an integer
pub fn construction_code(row: &ExposureRow) -> Option<i64> {
    row.integer("constructioncode")
}

/// Motor flag for a construction code
///
/// Codes in the unsupported range are not modelled unless the coverage is
/// "other".
pub fn motor_flag(
    construction: Option<i64>,
    coverage: OedCoverage,
    config: &LookupConfig,
) -> Result<bool, LookupError> {
    let Some(code) = construction else {
        return Ok(false);
    };
    if coverage != OedCoverage::Other && config.unsupported_construction.contains(code) {
        return Err(LookupError::UNSUPPORTED_CONSTRUCTION);
    }
    Ok(config.motor_construction.contains(code))
}

pub fn cover_id(coverage: OedCoverage, is_motor: bool) -> Result<CoverId, LookupError> {
    CoverId::from_oed(coverage, is_motor).ok_or(LookupError::NOT_MOTOR_RISK)
}

/// Lower-cased two-letter country code, or the configured default
pub fn country_code(row: &ExposureRow, config: &LookupConfig) -> String {
    row.text("countrycode")
        .filter(|code| code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()))
        .map(|code| code.to_ascii_lowercase())
        .unwrap_or_else(|| config.default_country.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn occupancy(value: Value) -> ExposureRow {
        ExposureRow::new().with("occupancycode", value)
    }

    #[test]
    fn test_occupancy_ranges() {
        let config = LookupConfig::default();
        let lob = |code: i64| line_of_business(&occupancy(json!(code)), &config);

        assert_eq!(lob(1000), Ok(LineOfBusiness::Residential));
        for code in 1050..1100 {
            assert_eq!(lob(code), Ok(LineOfBusiness::Residential));
        }
        for code in (1100..1150).chain(1200..1250) {
            assert_eq!(lob(code), Ok(LineOfBusiness::Commercial));
        }
        for code in 1150..1200 {
            assert_eq!(lob(code), Ok(LineOfBusiness::Industrial));
        }
        assert_eq!(
            line_of_business(&ExposureRow::new(), &config),
            Ok(LineOfBusiness::Residential)
        );
    }

    #[test]
    fn test_occupancy_errors_current() {
        let config = LookupConfig::default();
        assert_eq!(
            line_of_business(&occupancy(json!(0)), &config),
            Err(LookupError::UNSUPPORTED_OCCUPANCY)
        );
        for code in [1001, 1049, 1250, 3999] {
            assert_eq!(
                line_of_business(&occupancy(json!(code)), &config).map_err(|e| e.code),
                Err(230)
            );
        }
        assert_eq!(
            line_of_business(&occupancy(json!("a")), &config),
            Err(LookupError::MALFORMED_OCCUPANCY)
        );
        assert_eq!(
            line_of_business(&occupancy(json!(1050.5)), &config),
            Err(LookupError::MALFORMED_OCCUPANCY)
        );
    }

    #[test]
    fn test_occupancy_errors_legacy() {
        let config = LookupConfig::default().with_occupancy_errors(OccupancyErrorScheme::Legacy);
        for code in (1250..4000).step_by(50).chain([0]) {
            assert_eq!(
                line_of_business(&occupancy(json!(code)), &config).map_err(|e| e.code),
                Err(123)
            );
        }
        assert_eq!(
            line_of_business(&occupancy(json!("a")), &config).map_err(|e| e.code),
            Err(124)
        );
        assert_eq!(
            line_of_business(&occupancy(json!("1125")), &config),
            Ok(LineOfBusiness::Commercial)
        );
    }

    #[test]
    fn test_motor_flag() {
        let config = LookupConfig::default();
        for code in 5850..5950 {
            assert_eq!(motor_flag(Some(code), OedCoverage::Buildings, &config), Ok(true));
        }
        assert_eq!(motor_flag(None, OedCoverage::Buildings, &config), Ok(false));
        assert_eq!(motor_flag(Some(5000), OedCoverage::Contents, &config), Ok(false));
        assert_eq!(
            motor_flag(Some(5960), OedCoverage::Buildings, &config),
            Err(LookupError::UNSUPPORTED_CONSTRUCTION)
        );
        // "other" coverage is exempt from the unsupported range
        assert_eq!(motor_flag(Some(5960), OedCoverage::Other, &config), Ok(false));
    }

    #[test]
    fn test_cover_id() {
        assert_eq!(cover_id(OedCoverage::Buildings, false), Ok(CoverId::Building));
        assert_eq!(cover_id(OedCoverage::Buildings, true), Ok(CoverId::Motor));
        assert_eq!(cover_id(OedCoverage::Contents, true), Ok(CoverId::Contents));
        assert_eq!(cover_id(OedCoverage::Other, true), Ok(CoverId::Motor));
        assert_eq!(cover_id(OedCoverage::Other, false), Err(LookupError::NOT_MOTOR_RISK));
    }

    #[test]
    fn test_country_code() {
        let config = LookupConfig::default();
        assert_eq!(country_code(&ExposureRow::new(), &config), "au");
        let row = ExposureRow::new().with("countrycode", "NZ");
        assert_eq!(country_code(&row, &config), "nz");
        let row = ExposureRow::new().with("countrycode", 36);
        assert_eq!(country_code(&row, &config), "au");
        let row = ExposureRow::new().with("countrycode", "AUS");
        assert_eq!(country_code(&row, &config), "au");
    }
}
