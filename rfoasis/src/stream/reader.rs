//! Loss stream decoding
//!
//! The body carries no length or terminator. Groups are recovered from the
//! separator words alone: the first non-zero word after a separator (or at
//! the start) is a key, every following non-zero word is a sample.

use rfoasis_core::{
    format::constants::{HEADER_SIZE, RECORD_SIZE},
    LossRecord, SampleLoss, StreamError, StreamHeader, StreamKey,
};

/// A fully decoded stream
#[derive(Debug, Clone, PartialEq)]
pub struct LossStream {
    pub header: StreamHeader,
    pub records: Vec<LossRecord>,
}

/// Borrowing decoder over an in-memory stream
#[derive(Debug, Clone, Copy)]
pub struct LossStreamReader<'a> {
    header: StreamHeader,
    words: &'a [[u8; RECORD_SIZE]],
}

impl<'a> LossStreamReader<'a> {
    /// Validate the header and body length
    pub fn new(bytes: &'a [u8]) -> Result<Self, StreamError> {
        let header = StreamHeader::from_bytes(bytes)?;
        let words = body_words(&bytes[HEADER_SIZE..])?;
        Ok(Self { header, words })
    }

    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Number of 8-byte body words, separators included
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn records(&self) -> Records<'a> {
        Records::new(self.words)
    }

    pub fn read_all(&self) -> Result<LossStream, StreamError> {
        Ok(LossStream {
            header: self.header,
            records: self.records().collect::<Result<_, _>>()?,
        })
    }
}

/// Decode a headerless body
pub fn decode_body(body: &[u8]) -> Result<Vec<LossRecord>, StreamError> {
    Records::new(body_words(body)?).collect()
}

fn body_words(body: &[u8]) -> Result<&[[u8; RECORD_SIZE]], StreamError> {
    bytemuck::try_cast_slice(body).map_err(|_| StreamError::TruncatedRecord)
}

/// Iterator over the records of a body
#[derive(Debug, Clone)]
pub struct Records<'a> {
    words: std::slice::Iter<'a, [u8; RECORD_SIZE]>,
    key: Option<StreamKey>,
    /// Samples seen under the current key
    samples: usize,
}

impl<'a> Records<'a> {
    fn new(words: &'a [[u8; RECORD_SIZE]]) -> Self {
        Self {
            words: words.iter(),
            key: None,
            samples: 0,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = Result<LossRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(word) = self.words.next() else {
                // A key with no samples means the stream was cut short
                if self.key.take().is_some() && self.samples == 0 {
                    return Some(Err(StreamError::TruncatedRecord));
                }
                return None;
            };

            let is_zero = word.iter().all(|&b| b == 0);
            match self.key {
                None if is_zero => continue,
                None => {
                    let key = StreamKey::from_bytes(word);
                    // Event ids start at 1; a zero event id is a sample word
                    // where a key was expected
                    if key.event_id == 0 {
                        self.words = Default::default();
                        return Some(Err(StreamError::MissingKey));
                    }
                    self.key = Some(key);
                    self.samples = 0;
                }
                Some(_) if is_zero => self.key = None,
                Some(key) => {
                    self.samples += 1;
                    let sample = SampleLoss::from_bytes(word);
                    return Some(Ok(LossRecord::from_parts(key, sample)));
                }
            }
        }
    }
}

#[cfg(feature = "mmap")]
pub use mapped::MappedLossStream;

#[cfg(feature = "mmap")]
mod mapped {
    use std::{fs::File, path::Path};

    use memmap2::Mmap;
    use tracing::debug;

    use super::LossStreamReader;
    use crate::error::Result;

    /// Loss stream file mapped into memory
    #[derive(Debug)]
    pub struct MappedLossStream {
        mmap: Mmap,
    }

    impl MappedLossStream {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let file = File::open(path.as_ref())?;
            // SAFETY: the mapping is read-only and the file is not modified
            // while the stream is open
            let mmap = unsafe { Mmap::map(&file)? };
            debug!("Mapped {} bytes from {}", mmap.len(), path.as_ref().display());
            Ok(Self { mmap })
        }

        pub fn reader(&self) -> Result<LossStreamReader<'_>> {
            Ok(LossStreamReader::new(&self.mmap)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::writer::{write_body, write_header};
    use rfoasis_core::{format::constants::SEPARATOR, StreamKind};

    fn encode(batches: &[&[LossRecord]]) -> Vec<u8> {
        let mut out = Vec::new();
        write_header(&mut out, StreamKind::Item, 10).unwrap();
        for (i, batch) in batches.iter().enumerate() {
            write_body(&mut out, batch.iter(), i > 0).unwrap();
        }
        out
    }

    #[test]
    fn test_round_trip() {
        let records = [
            LossRecord::new(1, 100, -1, 5.0),
            LossRecord::new(1, 100, 1, 3.0),
            LossRecord::new(1, 101, -1, 2.0),
        ];
        let bytes = encode(&[&records]);
        let reader = LossStreamReader::new(&bytes).unwrap();
        assert_eq!(reader.header(), StreamHeader::new(StreamKind::Item, 10).unwrap());
        // key, 2 samples, separator, key, sample
        assert_eq!(reader.word_count(), 6);

        let stream = reader.read_all().unwrap();
        assert_eq!(stream.records, records);
    }

    #[test]
    fn test_batch_merge() {
        let first = [
            LossRecord::new(1, 1, -2, 0.5),
            LossRecord::new(1, 1, -1, 4.0),
            LossRecord::new(1, 1, 1, 4.0),
            LossRecord::new(2, 3, 1, 1.0),
        ];
        let second = [LossRecord::new(3, 1, 1, 7.0), LossRecord::new(3, 2, 1, 8.0)];
        let bytes = encode(&[&first, &second]);

        let body = &bytes[HEADER_SIZE..];
        let separators = body.chunks_exact(8).filter(|w| *w == SEPARATOR).count();
        assert_eq!(separators, 3);

        let records = LossStreamReader::new(&bytes).unwrap().read_all().unwrap().records;
        let expected: Vec<_> = first.iter().chain(second.iter()).copied().collect();
        assert_eq!(records, expected);
    }

    #[test]
    fn test_leading_and_trailing_separators() {
        let record = LossRecord::new(4, 2, 3, 1.25);
        let mut body = Vec::new();
        body.extend_from_slice(&SEPARATOR);
        write_body(&mut body, [record].iter(), true).unwrap();
        body.extend_from_slice(&SEPARATOR);

        assert_eq!(decode_body(&body).unwrap(), vec![record]);
    }

    #[test]
    fn test_malformed_bodies() {
        let mut bytes = encode(&[&[LossRecord::new(1, 1, 1, 1.0)]]);
        bytes.push(0);
        assert_eq!(LossStreamReader::new(&bytes).err(), Some(StreamError::TruncatedRecord));

        // Key without any samples
        let body = StreamKey::new(1, 1).to_bytes();
        assert_eq!(decode_body(&body), Err(StreamError::TruncatedRecord));

        // Sample word where a key is expected
        let body = SampleLoss::new(0, 2.0).to_bytes();
        assert_eq!(decode_body(&body), Err(StreamError::MissingKey));
    }

    #[test]
    fn test_bad_headers() {
        assert_eq!(LossStreamReader::new(&[1, 0, 0]).err(), Some(StreamError::InvalidHeader));

        let mut bytes = vec![0x05, 0, 0, 0x01, 10, 0, 0, 0];
        assert_eq!(
            LossStreamReader::new(&bytes).err(),
            Some(StreamError::UnsupportedStreamKind)
        );

        bytes[0] = 0x01;
        bytes[4] = 0;
        assert_eq!(
            LossStreamReader::new(&bytes).err(),
            Some(StreamError::InvalidSampleCount)
        );
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_stream() {
        use std::io::Write;

        let records = [LossRecord::new(9, 1, 1, 2.5), LossRecord::new(9, 2, 1, 3.5)];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encode(&[&records])).unwrap();
        file.flush().unwrap();

        let mapped = MappedLossStream::open(file.path()).unwrap();
        let stream = mapped.reader().unwrap().read_all().unwrap();
        assert_eq!(stream.records, records);
    }
}
