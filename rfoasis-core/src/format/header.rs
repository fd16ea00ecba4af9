//! Loss stream header definitions
//!
//! The header is two little-endian 32-bit words: the stream-type word
//! `(major << 24) | minor` followed by the signed sample count.

use super::constants::{tags, HEADER_SIZE, MAJOR_TAG_SHIFT, MINOR_KIND_MASK};
use crate::{Result, StreamError};

/// Supported stream kinds, each a distinct (major, minor) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StreamKind {
    /// Ground-up loss per item, (1, 1)
    Item,
    /// Ground-up loss per coverage, (1, 2)
    Coverage,
    /// Insured loss per output id, (2, 1)
    Loss,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [StreamKind::Item, StreamKind::Coverage, StreamKind::Loss];

    pub const fn major(self) -> u8 {
        match self {
            StreamKind::Item | StreamKind::Coverage => tags::GUL,
            StreamKind::Loss => tags::FM,
        }
    }

    pub const fn minor(self) -> u32 {
        match self {
            StreamKind::Item | StreamKind::Loss => 1,
            StreamKind::Coverage => 2,
        }
    }

    /// Look up the kind for a (major, minor) pair
    pub const fn from_parts(major: u8, minor: u32) -> Option<Self> {
        match (major, minor) {
            (tags::GUL, 1) => Some(StreamKind::Item),
            (tags::GUL, 2) => Some(StreamKind::Coverage),
            (tags::FM, 1) => Some(StreamKind::Loss),
            _ => None,
        }
    }

    /// Encoded stream-type word
    pub const fn type_word(self) -> u32 {
        ((self.major() as u32) << MAJOR_TAG_SHIFT) | self.minor()
    }

    /// Decode a stream-type word, `None` for unsupported pairs
    pub const fn from_type_word(word: u32) -> Option<Self> {
        let major = word >> MAJOR_TAG_SHIFT;
        if major > u8::MAX as u32 {
            return None;
        }
        Self::from_parts(major as u8, word & MINOR_KIND_MASK)
    }

    /// Parse the names used on the command line and in settings files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "item" | "items" => Some(StreamKind::Item),
            "coverage" | "coverages" => Some(StreamKind::Coverage),
            "loss" | "fm" => Some(StreamKind::Loss),
            _ => None,
        }
    }
}

impl core::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamKind::Item => write!(f, "item"),
            StreamKind::Coverage => write!(f, "coverage"),
            StreamKind::Loss => write!(f, "loss"),
        }
    }
}

/// Header preceding the body of a loss stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub kind: StreamKind,
    /// Number of samples per key, always positive
    pub samples: i32,
}

impl StreamHeader {
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a header, `None` when the sample count is not positive
    pub const fn new(kind: StreamKind, samples: i32) -> Option<Self> {
        if samples <= 0 {
            return None;
        }
        Some(Self { kind, samples })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.kind.type_word().to_le_bytes());
        bytes[4..8].copy_from_slice(&self.samples.to_le_bytes());
        bytes
    }

    /// Parse header from the start of a stream
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(StreamError::InvalidHeader);
        }

        let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let samples = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        let kind = StreamKind::from_type_word(word).ok_or(StreamError::UnsupportedStreamKind)?;
        Self::new(kind, samples).ok_or(StreamError::InvalidSampleCount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_words() {
        assert_eq!(StreamKind::Item.type_word(), 0x0100_0001);
        assert_eq!(StreamKind::Coverage.type_word(), 0x0100_0002);
        assert_eq!(StreamKind::Loss.type_word(), 0x0200_0001);

        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::from_type_word(kind.type_word()), Some(kind));
        }
        assert_eq!(StreamKind::from_type_word(0x0100_0003), None);
        assert_eq!(StreamKind::from_type_word(0x0300_0001), None);
        assert_eq!(StreamKind::from_type_word(0), None);
    }

    #[test]
    fn test_header_bytes() {
        let header = StreamHeader::new(StreamKind::Coverage, 10).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes, [2, 0, 0, 1, 10, 0, 0, 0]);
        assert_eq!(StreamHeader::from_bytes(&bytes), Ok(header));
    }

    #[test]
    fn test_header_rejects() {
        assert_eq!(StreamHeader::new(StreamKind::Item, 0), None);
        assert_eq!(StreamHeader::new(StreamKind::Item, -4), None);

        assert_eq!(
            StreamHeader::from_bytes(&[1, 0, 0, 1]),
            Err(StreamError::InvalidHeader)
        );
        assert_eq!(
            StreamHeader::from_bytes(&[9, 0, 0, 1, 10, 0, 0, 0]),
            Err(StreamError::UnsupportedStreamKind)
        );
        assert_eq!(
            StreamHeader::from_bytes(&[1, 0, 0, 1, 0, 0, 0, 0]),
            Err(StreamError::InvalidSampleCount)
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(StreamKind::from_name("items"), Some(StreamKind::Item));
        assert_eq!(StreamKind::from_name("coverage"), Some(StreamKind::Coverage));
        assert_eq!(StreamKind::from_name("fm"), Some(StreamKind::Loss));
        assert_eq!(StreamKind::from_name("summary"), None);
    }
}
