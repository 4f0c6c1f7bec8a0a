//! The 12 byte sector header that prefixes every record inside a payload
use alloc::vec::Vec;
use core::ops::Range;

use crate::{read_u32, Error, CHUNK_HEADER_SIZE};

/// A chunk header. `size` spans the header and its body, so it is also the
/// distance to the next sibling chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: u32,
    pub count: u32,
    pub size: u32,
}

impl ChunkHeader {
    /// Read a header at `offset`. The tag is not interpreted.
    pub fn read(buf: &[u8], offset: usize) -> Result<ChunkHeader, Error> {
        let end = offset.checked_add(CHUNK_HEADER_SIZE).ok_or(Error::Overflow)?;
        if end > buf.len() {
            return Err(Error::truncated(offset, CHUNK_HEADER_SIZE, buf.len()));
        }

        Ok(ChunkHeader {
            tag: read_u32(buf, offset)?,
            count: read_u32(buf, offset + 4)?,
            size: read_u32(buf, offset + 8)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; CHUNK_HEADER_SIZE] {
        let mut bytes = [0; CHUNK_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.tag.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    /// Length of the body following the header, or `None` if `size` is too
    /// small to hold the header itself
    pub fn body_len(&self) -> Option<usize> {
        (self.size as usize).checked_sub(CHUNK_HEADER_SIZE)
    }
}

/// Prepend a header to a finished chunk body. The size field covers the body
/// as it is now, so this must be called after the body is complete.
pub fn insert_header(buf: &mut Vec<u8>, tag: u32, count: u32) {
    let header = ChunkHeader {
        tag,
        count,
        size: (buf.len() + CHUNK_HEADER_SIZE) as u32,
    };
    buf.splice(0..0, header.to_bytes());
}

/// Iterator over sibling chunks inside a byte range of a buffer.
///
/// Yields the offset of each header along with the header. Iteration stops
/// after the first error.
#[derive(Debug)]
pub struct Chunks<'a> {
    buf: &'a [u8],
    offset: usize,
    end: usize,
    done: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(buf: &'a [u8], range: Range<usize>) -> Chunks<'a> {
        Chunks {
            buf,
            offset: range.start,
            end: range.end.min(buf.len()),
            done: false,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<(usize, ChunkHeader), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.end {
            return None;
        }

        let offset = self.offset;
        let header = match ChunkHeader::read(&self.buf[..self.end], offset) {
            Ok(header) => header,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        if header.body_len().is_none() {
            self.done = true;
            return Some(Err(Error::InvalidChunkSize {
                offset,
                size: header.size,
            }));
        }

        let next = offset + header.size as usize;
        if next > self.end {
            self.done = true;
            return Some(Err(Error::truncated(
                offset,
                header.size as usize,
                self.end,
            )));
        }

        self.offset = next;
        Some(Ok((offset, header)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{insert_header, ChunkHeader, Chunks};
    use crate::Error;

    #[test]
    fn read_header_fields() {
        let buf = [
            0x01, 0, 0, 0, //
            0x04, 0, 0, 0, //
            0x30, 0, 0, 0,
        ];
        let header = ChunkHeader::read(&buf, 0).unwrap();
        assert_eq!(header.tag, 1);
        assert_eq!(header.count, 4);
        assert_eq!(header.size, 0x30);
        assert_eq!(header.to_bytes(), buf);
    }

    #[test]
    fn read_past_end() {
        let buf = [0; 16];
        assert_eq!(
            ChunkHeader::read(&buf, 8),
            Err(Error::TruncatedData {
                offset: 8,
                len: 12,
                available: 16
            })
        );
    }

    #[test]
    fn insert_header_counts_itself() {
        let mut body = vec![0xAA; 20];
        insert_header(&mut body, 0x0000_0009, 2);

        assert_eq!(body.len(), 32);
        let header = ChunkHeader::read(&body, 0).unwrap();
        assert_eq!(header.tag, 9);
        assert_eq!(header.count, 2);
        assert_eq!(header.size, 32);
        assert_eq!(header.body_len(), Some(20));
        assert!(body[12..].iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn iterate_siblings() {
        let mut first = vec![1; 4];
        insert_header(&mut first, 0x0005_0000, 1);
        let mut second = Vec::new();
        insert_header(&mut second, 0x0007_0000, 0);

        let mut buf = first.clone();
        buf.extend_from_slice(&second);

        let chunks: Vec<_> = Chunks::new(&buf, 0..buf.len())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].0, 0);
        assert_eq!(chunks[0].1.tag, 0x0005_0000);
        assert_eq!(chunks[1].0, 16);
        assert_eq!(chunks[1].1.size, 12);
    }

    #[test]
    fn undersized_chunk_stops_iteration() {
        let header = ChunkHeader {
            tag: 2,
            count: 0,
            size: 4,
        };
        let buf = header.to_bytes();
        let mut chunks = Chunks::new(&buf, 0..buf.len());
        assert_eq!(
            chunks.next(),
            Some(Err(Error::InvalidChunkSize { offset: 0, size: 4 }))
        );
        assert_eq!(chunks.next(), None);
    }

    #[test]
    fn oversized_chunk_is_truncated() {
        let header = ChunkHeader {
            tag: 2,
            count: 0,
            size: 64,
        };
        let buf = header.to_bytes();
        let mut chunks = Chunks::new(&buf, 0..buf.len());
        assert!(matches!(
            chunks.next(),
            Some(Err(Error::TruncatedData { .. }))
        ));
        assert_eq!(chunks.next(), None);
    }
}
