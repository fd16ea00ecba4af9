//! Loss stream encoding

use std::io::{self, Write};

use rfoasis_core::{
    format::constants::SEPARATOR, LossRecord, StreamError, StreamHeader, StreamKey, StreamKind,
};
use tracing::{info, warn};

/// Write the 8-byte stream header
///
/// Nothing is written for a non-positive sample count; the call returns
/// `Ok(false)` instead of failing.
pub fn write_header<W: Write>(out: &mut W, kind: StreamKind, samples: i32) -> io::Result<bool> {
    let Some(header) = StreamHeader::new(kind, samples) else {
        warn!("Not writing {kind} stream header: sample count {samples} is not positive");
        return Ok(false);
    };
    out.write_all(&header.to_bytes())?;
    Ok(true)
}

/// Write the header for a raw stream type word
///
/// Words naming an unsupported (major, minor) pair write nothing.
pub fn write_header_word<W: Write>(out: &mut W, type_word: u32, samples: i32) -> io::Result<bool> {
    match StreamKind::from_type_word(type_word) {
        Some(kind) => write_header(out, kind, samples),
        None => {
            warn!("Not writing stream header: unsupported stream type {type_word:#010x}");
            Ok(false)
        }
    }
}

/// Write grouped body records
///
/// A separator precedes every key change, and the first key too when
/// `leading_separator` is set. Returns the last key written.
///
/// A record failing [`LossRecord::validate`] stops the write with an
/// `InvalidInput` error; records before it have already been written.
pub fn write_body<'a, W, I>(out: &mut W, records: I, leading_separator: bool) -> io::Result<Option<StreamKey>>
where
    W: Write,
    I: IntoIterator<Item = &'a LossRecord>,
{
    let mut current: Option<StreamKey> = None;
    for record in records {
        record.validate().map_err(unencodable)?;
        let key = record.key();
        if current != Some(key) {
            if current.is_some() || leading_separator {
                out.write_all(&SEPARATOR)?;
            }
            out.write_all(&key.to_bytes())?;
            current = Some(key);
        }
        out.write_all(&record.sample().to_bytes())?;
    }
    Ok(current)
}

fn unencodable(err: StreamError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

/// Header plus body writer merging any number of sorted batches
#[derive(Debug)]
pub struct LossStreamWriter<W: Write> {
    out: W,
    header: StreamHeader,
    last_key: Option<StreamKey>,
    batches: usize,
    records: usize,
}

impl<W: Write> LossStreamWriter<W> {
    /// Write the header; `Ok(None)` when the sample count is not positive
    pub fn new(mut out: W, kind: StreamKind, samples: i32) -> io::Result<Option<Self>> {
        if !write_header(&mut out, kind, samples)? {
            return Ok(None);
        }
        let Some(header) = StreamHeader::new(kind, samples) else {
            return Ok(None);
        };
        Ok(Some(Self {
            out,
            header,
            last_key: None,
            batches: 0,
            records: 0,
        }))
    }

    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Append one sorted batch
    ///
    /// The batch is separated from the previous one whenever anything has
    /// been written already. A batch holding an unencodable record is
    /// rejected whole.
    pub fn write_batch(&mut self, records: &[LossRecord]) -> io::Result<()> {
        if let Some(err) = records.iter().find_map(|record| record.validate().err()) {
            warn!("Rejecting batch of {} records: {err}", records.len());
            return Err(unencodable(err));
        }
        let leading = self.last_key.is_some();
        if let Some(key) = write_body(&mut self.out, records, leading)? {
            self.last_key = Some(key);
        }
        self.batches += 1;
        self.records += records.len();
        Ok(())
    }

    /// Flush the sink and hand it back
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        info!(
            "Wrote {} stream: {} records in {} batches",
            self.header.kind, self.records, self.batches
        );
        Ok(self.out)
    }
}
