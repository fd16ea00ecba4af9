//! Grouped loss stream output and input
//!
//! The writer serialises pre-sorted `(event, target, sidx, loss)` tuples; it
//! never reorders them. Callers must supply tuples ascending by event id,
//! then target id, with a stable sample order inside each key. Independently
//! produced batches are merged by writing them in ascending batch order.

pub mod reader;
pub mod writer;

pub use reader::{decode_body, LossStream, LossStreamReader, Records};
#[cfg(feature = "mmap")]
pub use reader::MappedLossStream;
pub use writer::{write_body, write_header, write_header_word, LossStreamWriter};

/// Partition of an event set processed independently of the others
///
/// Always holds `1 <= batch <= batches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBatch {
    batch: u32,
    batches: u32,
}

impl EventBatch {
    /// `None` unless `1 <= batch <= batches`
    pub fn new(batch: u32, batches: u32) -> Option<Self> {
        (batches > 0 && (1..=batches).contains(&batch)).then_some(Self { batch, batches })
    }

    /// Every batch of a `batches`-way split, in merge order
    pub fn all(batches: u32) -> impl Iterator<Item = EventBatch> {
        (1..=batches).map(move |batch| EventBatch { batch, batches })
    }

    /// 1-based batch number
    pub fn batch(&self) -> u32 {
        self.batch
    }

    pub fn batches(&self) -> u32 {
        self.batches
    }

    /// Inclusive event id range `[(b-1)*max/n + 1, b*max/n]` of this batch
    pub fn event_range(&self, max_event_id: u32) -> (u32, u32) {
        let max = max_event_id as u64;
        let n = self.batches as u64;
        let b = self.batch as u64;
        let first = (b - 1) * max / n + 1;
        let last = b * max / n;
        (first as u32, last as u32)
    }

    /// Whether an event belongs to this batch
    pub fn contains(&self, event_id: u32, max_event_id: u32) -> bool {
        let (first, last) = self.event_range(max_event_id);
        (first..=last).contains(&event_id)
    }
}
