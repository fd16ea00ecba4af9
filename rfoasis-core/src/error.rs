//! Error types for loss stream decoding and exposure lookups

/// Errors raised while decoding a grouped loss stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Fewer than eight bytes available for the header
    InvalidHeader,
    /// Header names a (major, minor) pair outside the supported set
    UnsupportedStreamKind,
    /// Header carries a sample count that is not positive
    InvalidSampleCount,
    /// Body length is not a whole number of 8-byte words
    TruncatedRecord,
    /// A sample/loss pair appeared before any event/target key
    MissingKey,
    /// Record whose words would read back as a separator or a missing key
    UnencodableRecord,
}

impl core::fmt::Display for StreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            StreamError::InvalidHeader => "Invalid loss stream header",
            StreamError::UnsupportedStreamKind => "Unsupported loss stream kind",
            StreamError::InvalidSampleCount => "Sample count must be positive",
            StreamError::TruncatedRecord => "Loss stream body is not a whole number of records",
            StreamError::MissingKey => "Sample record found before an event/target key",
            StreamError::UnencodableRecord => {
                "Loss record needs a non-zero event id and a sample word that is not all zero"
            }
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for StreamError {}

/// Result type for loss stream operations
pub type Result<T> = core::result::Result<T, StreamError>;

/// Family a lookup failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupErrorKind {
    MissingRequiredField,
    InvalidInput,
    UnsupportedPeril,
    InvalidOccupancyCode,
    UnsupportedLobOrConstruction,
    IncompleteGeocode,
    UnsupportedCombination,
    MotorCoverageMismatch,
    OutOfRegion,
}

/// A typed lookup failure carrying its stable numeric code
///
/// Codes are a cross-system contract and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub code: u16,
}

impl LookupError {
    /// `locperilscovered` is absent
    pub const MISSING_PERILS_COVERED: Self = Self::new(LookupErrorKind::MissingRequiredField, 101);
    /// Location identifier is absent
    pub const MISSING_LOCATION_ID: Self = Self::new(LookupErrorKind::MissingRequiredField, 102);
    /// Row has no usable geocode attribute
    pub const INCOMPLETE_GEOCODE: Self = Self::new(LookupErrorKind::IncompleteGeocode, 110);
    /// Lat/long outside the modelled bounding box
    pub const OUT_OF_REGION: Self = Self::new(LookupErrorKind::OutOfRegion, 121);
    /// Model peril not in the covered peril set
    pub const UNSUPPORTED_PERIL: Self = Self::new(LookupErrorKind::UnsupportedPeril, 122);
    /// Malformed occupancy code
    pub const MALFORMED_OCCUPANCY: Self = Self::new(LookupErrorKind::InvalidInput, 123);
    /// Legacy numbering: occupancy code outside the table
    pub const LEGACY_UNSUPPORTED_OCCUPANCY: Self =
        Self::new(LookupErrorKind::InvalidOccupancyCode, 123);
    /// Legacy numbering: malformed occupancy code
    pub const LEGACY_MALFORMED_OCCUPANCY: Self =
        Self::new(LookupErrorKind::InvalidOccupancyCode, 124);
    /// Residential line of business with business interruption cover
    pub const RESIDENTIAL_BI: Self = Self::new(LookupErrorKind::UnsupportedCombination, 151);
    /// Motor exposure requested but the row is not a motor risk
    pub const NOT_MOTOR_RISK: Self = Self::new(LookupErrorKind::MotorCoverageMismatch, 152);
    /// Motor construction on a non-motor cover, or unsupported "other" cover
    pub const MOTOR_COVERAGE_MISMATCH: Self =
        Self::new(LookupErrorKind::MotorCoverageMismatch, 210);
    /// Occupancy code outside every configured range
    pub const UNSUPPORTED_OCCUPANCY: Self =
        Self::new(LookupErrorKind::UnsupportedLobOrConstruction, 230);
    /// Construction code in the unsupported range
    pub const UNSUPPORTED_CONSTRUCTION: Self =
        Self::new(LookupErrorKind::UnsupportedLobOrConstruction, 230);

    pub const fn new(kind: LookupErrorKind, code: u16) -> Self {
        Self { kind, code }
    }

    /// Codes in the 2xx range describe risks the model does not cover
    /// rather than bad input.
    pub const fn is_not_modelled(&self) -> bool {
        self.code >= 200 && self.code < 300
    }
}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self.code {
            101 => "Covered perils (locperilscovered) is required but missing",
            102 => "Location identifier is required but missing",
            110 => "No address, postcode, cresta zone, ICA zone or lat/long available",
            121 => "Latitude/longitude outside the modelled region",
            122 => "Model peril is not covered by this location",
            123 if self.kind == LookupErrorKind::InvalidInput => "Occupancy code is not a valid number",
            123 => "Occupancy code is not supported",
            124 => "Occupancy code is not a valid number",
            151 => "Business interruption is not supported for residential risks",
            152 => "Motor exposure requested but the location is not a motor risk",
            210 => "Coverage is not supported for this construction code",
            230 => "Occupancy or construction code is not modelled",
            _ => "Lookup failed",
        };
        write!(f, "{msg} (code {})", self.code)
    }
}

impl core::error::Error for LookupError {}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_not_modelled_range() {
        assert!(LookupError::UNSUPPORTED_OCCUPANCY.is_not_modelled());
        assert!(LookupError::MOTOR_COVERAGE_MISMATCH.is_not_modelled());
        assert!(!LookupError::NOT_MOTOR_RISK.is_not_modelled());
        assert!(!LookupError::INCOMPLETE_GEOCODE.is_not_modelled());
    }

    #[test]
    fn test_display_carries_code() {
        let msg = LookupError::OUT_OF_REGION.to_string();
        assert!(msg.ends_with("(code 121)"));

        assert_eq!(
            LookupError::MALFORMED_OCCUPANCY.to_string(),
            LookupError::LEGACY_MALFORMED_OCCUPANCY
                .to_string()
                .replace("124", "123")
        );
        assert_ne!(
            LookupError::MALFORMED_OCCUPANCY.to_string(),
            LookupError::LEGACY_UNSUPPORTED_OCCUPANCY.to_string()
        );
    }
}
