//! Geographic bounds checks

use crate::LookupError;

/// Axis-aligned box in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Mainland Australia and Tasmania
    pub const AUSTRALIA: BoundingBox = BoundingBox::new(112.0, -44.0, 154.0, -10.0);

    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Edges are inside
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat <= lat && lat <= self.max_lat && self.min_lon <= lon && lon <= self.max_lon
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::AUSTRALIA
    }
}

/// Validate a latitude/longitude pair
///
/// A pair is usable only when both values are present, finite and non-zero.
/// Unusable pairs yield `Ok(None)`; usable pairs outside `bbox` are an
/// out-of-region error.
pub fn validate_lat_long(
    lat: Option<f64>,
    lon: Option<f64>,
    bbox: &BoundingBox,
) -> Result<Option<(f64, f64)>, LookupError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Ok(None);
    };
    if !lat.is_finite() || !lon.is_finite() || lat == 0.0 || lon == 0.0 {
        return Ok(None);
    }
    if !bbox.contains(lat, lon) {
        return Err(LookupError::OUT_OF_REGION);
    }
    Ok(Some((lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_australia_box() {
        let bbox = BoundingBox::default();
        assert!(bbox.contains(-33.8688, 151.2093));
        assert!(bbox.contains(-44.0, 112.0));
        assert!(!bbox.contains(-41.28, 174.77));
        assert!(!bbox.contains(33.8688, 151.2093));
    }

    #[test]
    fn test_validate_lat_long() {
        let bbox = BoundingBox::AUSTRALIA;
        assert_eq!(
            validate_lat_long(Some(-33.8688), Some(151.2093), &bbox),
            Ok(Some((-33.8688, 151.2093)))
        );

        // Missing, zero or NaN values are unusable, not errors
        assert_eq!(validate_lat_long(None, Some(151.2), &bbox), Ok(None));
        assert_eq!(validate_lat_long(Some(-33.8), None, &bbox), Ok(None));
        assert_eq!(validate_lat_long(Some(0.0), Some(0.0), &bbox), Ok(None));
        assert_eq!(validate_lat_long(Some(-33.8), Some(0.0), &bbox), Ok(None));
        assert_eq!(validate_lat_long(Some(f64::NAN), Some(151.2), &bbox), Ok(None));

        assert_eq!(
            validate_lat_long(Some(51.5), Some(-0.12), &bbox),
            Err(LookupError::OUT_OF_REGION)
        );
    }
}
