//! Line of business and the occupancy/construction code tables

/// Line-of-business classification of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum LineOfBusiness {
    Residential = 1,
    Commercial = 2,
    Industrial = 3,
}

impl LineOfBusiness {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Inclusive range of OED codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeRange {
    pub start: i64,
    pub end: i64,
}

impl CodeRange {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub const fn contains(&self, code: i64) -> bool {
        self.start <= code && code <= self.end
    }

    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Construction codes describing motor vehicles
    pub const MOTOR: CodeRange = CodeRange::new(5850, 5949);
    /// Marine motor sub-range, always stored as static motor
    pub const MOTOR_MARINE: CodeRange = CodeRange::new(5930, 5949);
    /// Construction codes the model does not support
    pub const UNSUPPORTED_CONSTRUCTION: CodeRange = CodeRange::new(5950, 5999);
}

/// One row of the occupancy classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyRange {
    pub codes: CodeRange,
    pub lob: LineOfBusiness,
}

impl OccupancyRange {
    pub const fn new(start: i64, end: i64, lob: LineOfBusiness) -> Self {
        Self {
            codes: CodeRange::new(start, end),
            lob,
        }
    }
}

/// Occupancy table used when no override is configured
pub const DEFAULT_OCCUPANCY_TABLE: [OccupancyRange; 5] = [
    OccupancyRange::new(1000, 1000, LineOfBusiness::Residential),
    OccupancyRange::new(1050, 1099, LineOfBusiness::Residential),
    OccupancyRange::new(1100, 1149, LineOfBusiness::Commercial),
    OccupancyRange::new(1150, 1199, LineOfBusiness::Industrial),
    OccupancyRange::new(1200, 1249, LineOfBusiness::Commercial),
];

/// First matching table row wins
pub fn classify_occupancy(code: i64, table: &[OccupancyRange]) -> Option<LineOfBusiness> {
    table
        .iter()
        .find(|range| range.codes.contains(code))
        .map(|range| range.lob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = &DEFAULT_OCCUPANCY_TABLE;
        assert_eq!(classify_occupancy(1000, table), Some(LineOfBusiness::Residential));
        for code in 1050..1100 {
            assert_eq!(classify_occupancy(code, table), Some(LineOfBusiness::Residential));
        }
        for code in (1100..1150).chain(1200..1250) {
            assert_eq!(classify_occupancy(code, table), Some(LineOfBusiness::Commercial));
        }
        for code in 1150..1200 {
            assert_eq!(classify_occupancy(code, table), Some(LineOfBusiness::Industrial));
        }
    }

    #[test]
    fn test_unclassified_codes() {
        let table = &DEFAULT_OCCUPANCY_TABLE;
        assert_eq!(classify_occupancy(0, table), None);
        assert_eq!(classify_occupancy(1001, table), None);
        for code in 1250..4000 {
            assert_eq!(classify_occupancy(code, table), None);
        }
    }

    #[test]
    fn test_construction_ranges() {
        assert!(CodeRange::MOTOR.contains(5850));
        assert!(CodeRange::MOTOR.contains(5949));
        assert!(!CodeRange::MOTOR.contains(5950));
        assert!(CodeRange::UNSUPPORTED_CONSTRUCTION.contains(5950));
        assert!(CodeRange::MOTOR_MARINE.contains(5930));
        assert!(!CodeRange::MOTOR_MARINE.contains(5929));
        assert!(CodeRange::new(5, 4).is_empty());
    }
}
