//! Body records of the grouped loss stream
//!
//! A body is a sequence of 8-byte words. A key word carries the
//! (event, target) pair, each following word carries one (sample, loss)
//! pair, and an all-zero word separates consecutive key groups.

use bytemuck::{Pod, Zeroable};

use super::constants::RECORD_SIZE;
use crate::error::{Result, StreamError};

/// (event, target) key opening a group
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct StreamKey {
    pub event_id: u32,
    /// Item, coverage or output id depending on the stream kind
    pub target_id: u32,
}

impl StreamKey {
    pub const fn new(event_id: u32, target_id: u32) -> Self {
        Self { event_id, target_id }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..4].copy_from_slice(&self.event_id.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.target_id.to_le_bytes());
        bytes
    }

    pub fn from_bytes(word: &[u8; RECORD_SIZE]) -> Self {
        Self {
            event_id: u32::from_le_bytes([word[0], word[1], word[2], word[3]]),
            target_id: u32::from_le_bytes([word[4], word[5], word[6], word[7]]),
        }
    }
}

/// One sample of a group
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SampleLoss {
    pub sidx: i32,
    pub loss: f32,
}

impl SampleLoss {
    pub const fn new(sidx: i32, loss: f32) -> Self {
        Self { sidx, loss }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..4].copy_from_slice(&self.sidx.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.loss.to_le_bytes());
        bytes
    }

    pub fn from_bytes(word: &[u8; RECORD_SIZE]) -> Self {
        Self {
            sidx: i32::from_le_bytes([word[0], word[1], word[2], word[3]]),
            loss: f32::from_le_bytes([word[4], word[5], word[6], word[7]]),
        }
    }

    /// Whether this pair is the zero word that terminates a group
    pub fn is_separator(&self) -> bool {
        self.sidx == 0 && self.loss.to_bits() == 0
    }
}

/// Flattened (event, target, sample, loss) tuple as produced upstream
///
/// Only records passing [`LossRecord::validate`] survive a round trip:
/// event id 0 reads back as a missing key and the pair (0, 0.0) as a
/// group separator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossRecord {
    pub event_id: u32,
    pub target_id: u32,
    pub sidx: i32,
    pub loss: f32,
}

impl LossRecord {
    pub const fn new(event_id: u32, target_id: u32, sidx: i32, loss: f32) -> Self {
        Self {
            event_id,
            target_id,
            sidx,
            loss,
        }
    }

    pub const fn key(&self) -> StreamKey {
        StreamKey::new(self.event_id, self.target_id)
    }

    pub const fn sample(&self) -> SampleLoss {
        SampleLoss::new(self.sidx, self.loss)
    }

    pub const fn from_parts(key: StreamKey, sample: SampleLoss) -> Self {
        Self::new(key.event_id, key.target_id, sample.sidx, sample.loss)
    }

    /// Check the record can be encoded without colliding with a separator
    pub fn validate(&self) -> Result<()> {
        if self.event_id == 0 || self.sample().is_separator() {
            return Err(StreamError::UnencodableRecord);
        }
        Ok(())
    }
}

impl From<(u32, u32, i32, f32)> for LossRecord {
    fn from((event_id, target_id, sidx, loss): (u32, u32, i32, f32)) -> Self {
        Self::new(event_id, target_id, sidx, loss)
    }
}
