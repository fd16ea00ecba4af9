//! Format constants for the grouped loss stream

/// Every body record (separator, key or sample pair) is one 8-byte word
pub const RECORD_SIZE: usize = 8;

/// Stream-type word plus sample count
pub const HEADER_SIZE: usize = 8;

/// Record written between two key groups: sample index 0, loss 0.0
pub const SEPARATOR: [u8; RECORD_SIZE] = [0; RECORD_SIZE];

/// Bit position of the major tag inside the stream-type word
pub const MAJOR_TAG_SHIFT: u32 = 24;

/// Mask selecting the minor kind inside the stream-type word
pub const MINOR_KIND_MASK: u32 = (1 << MAJOR_TAG_SHIFT) - 1;

/// Major tags
pub mod tags {
    /// Ground-up loss streams (item and coverage)
    pub const GUL: u8 = 1;
    /// Insured loss streams
    pub const FM: u8 = 2;
}

/// Sample indices with special meaning, negative by convention
pub mod sidx {
    /// Analytical mean of the loss distribution
    pub const MEAN: i32 = -1;
    /// Analytical standard deviation
    pub const STD_DEV: i32 = -2;
    /// Total insured value
    pub const TIV: i32 = -3;
}
