//! OED coverage kinds and canonical cover ids

/// Coverage kind as numbered by OED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OedCoverage {
    Buildings = 1,
    Other = 2,
    Contents = 3,
    BusinessInterruption = 4,
}

impl OedCoverage {
    pub const ALL: [OedCoverage; 4] = [
        OedCoverage::Buildings,
        OedCoverage::Other,
        OedCoverage::Contents,
        OedCoverage::BusinessInterruption,
    ];

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(OedCoverage::Buildings),
            2 => Some(OedCoverage::Other),
            3 => Some(OedCoverage::Contents),
            4 => Some(OedCoverage::BusinessInterruption),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Location column carrying the insured value of this coverage
    pub const fn tiv_column(self) -> &'static str {
        match self {
            OedCoverage::Buildings => "buildingtiv",
            OedCoverage::Other => "othertiv",
            OedCoverage::Contents => "contentstiv",
            OedCoverage::BusinessInterruption => "bitiv",
        }
    }
}

/// Cover id understood by the loss engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CoverId {
    Building = 1,
    Contents = 2,
    BusinessInterruption = 3,
    Motor = 4,
}

impl CoverId {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Map an OED coverage onto a cover id
    ///
    /// `Other` has no generic target: it only maps when the row is a motor
    /// risk, so `None` is returned otherwise.
    pub const fn from_oed(coverage: OedCoverage, is_motor: bool) -> Option<Self> {
        match (coverage, is_motor) {
            (OedCoverage::Buildings, false) => Some(CoverId::Building),
            (OedCoverage::Buildings, true) | (OedCoverage::Other, true) => Some(CoverId::Motor),
            (OedCoverage::Contents, _) => Some(CoverId::Contents),
            (OedCoverage::BusinessInterruption, _) => Some(CoverId::BusinessInterruption),
            (OedCoverage::Other, false) => None,
        }
    }
}
