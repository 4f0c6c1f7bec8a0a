use alloc::format;
use alloc::string::ToString;
use core::error;
use core::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read of `len` bytes at `offset` runs past the end of a buffer
    /// holding `available` bytes
    TruncatedData {
        offset: usize,
        len: usize,
        available: usize,
    },
    /// The sector counts in the index do not add up to the archive length
    IndexInconsistent { expected: usize, actual: usize },
    EntryOutOfRange { index: usize, count: usize },
    TooManyEntries(u32),
    InvalidChunkSize { offset: usize, size: u32 },
    /// A back-reference points before the start of the decompressed output
    InvalidBackReference { offset: usize, available: usize },
    Overflow,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            TruncatedData {
                offset,
                len,
                available,
            } => format!(
                "Truncated data: read of {} bytes at {:#x} exceeds buffer of {} bytes",
                len, offset, available
            ),
            IndexInconsistent { expected, actual } => format!(
                "Index inconsistent: sector counts describe {} bytes, archive has {}",
                expected, actual
            ),
            EntryOutOfRange { index, count } => {
                format!("Entry {} out of range (archive has {} entries)", index, count)
            }
            TooManyEntries(count) => format!("Too many entries for header sector: {}", count),
            InvalidChunkSize { offset, size } => {
                format!("Invalid chunk size {:#x} at {:#x}", size, offset)
            }
            InvalidBackReference { offset, available } => format!(
                "Back-reference of {} bytes with only {} bytes decompressed",
                offset, available
            ),
            Overflow => "Overflow".to_string(),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

impl Error {
    pub(crate) fn truncated(offset: usize, len: usize, available: usize) -> Error {
        Error::TruncatedData {
            offset,
            len,
            available,
        }
    }
}
