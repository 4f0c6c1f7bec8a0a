//! The archive header: file count and the entry table, all within the first
//! sector of the archive
use alloc::vec::Vec;
use core::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::{Entry, Error, DATA_OFFSET, ENTRY_SIZE, HEADER_SIZE, MAX_ENTRIES, SECTOR_SIZE};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Header {
    /// Count of Entry structs, which start immediately after the header
    pub count: u32,
}

impl Header {
    /// Parse the header from the start of an archive
    pub fn new(data: &[u8]) -> Result<&Header, Error> {
        let bytes = data
            .get(..HEADER_SIZE)
            .ok_or_else(|| Error::truncated(0, HEADER_SIZE, data.len()))?;
        let header: &Header =
            bytemuck::try_from_bytes(bytes).map_err(|_| Error::truncated(0, HEADER_SIZE, data.len()))?;

        if header.count() > MAX_ENTRIES as u32 {
            return Err(Error::TooManyEntries(header.count()));
        }
        Ok(header)
    }

    pub fn count(&self) -> u32 {
        u32::from_le(self.count)
    }

    /// Retrieve the size of the entries
    pub fn entries_size(&self) -> usize {
        self.count() as usize * ENTRY_SIZE
    }

    /// Parse entries from the bytes following the header
    pub fn entries<'a>(&self, data: &'a [u8]) -> Result<&'a [Entry], Error> {
        let entries_size = self.entries_size();
        let entries_data = data
            .get(..entries_size)
            .ok_or_else(|| Error::truncated(HEADER_SIZE, entries_size, HEADER_SIZE + data.len()))?;

        bytemuck::try_cast_slice(entries_data)
            .map_err(|_| Error::truncated(HEADER_SIZE, entries_size, HEADER_SIZE + data.len()))
    }
}

/// Read the entry table of an archive
pub fn read_index(archive: &[u8]) -> Result<Vec<Entry>, Error> {
    let header = Header::new(archive)?;
    Ok(header.entries(&archive[HEADER_SIZE..])?.to_vec())
}

/// Byte range of entry `index` inside the archive
pub fn entry_range(entries: &[Entry], index: usize) -> Result<Range<usize>, Error> {
    let entry = entries.get(index).ok_or(Error::EntryOutOfRange {
        index,
        count: entries.len(),
    })?;

    let start = entries[..index]
        .iter()
        .fold(DATA_OFFSET, |offset, entry| offset + entry.size());
    Ok(start..start + entry.size())
}

/// Archive length described by the entry table
pub fn described_len(entries: &[Entry]) -> usize {
    entries
        .iter()
        .fold(DATA_OFFSET, |len, entry| len + entry.size())
}

/// Check that the entry table describes exactly `len` bytes
pub fn validate(entries: &[Entry], len: usize) -> Result<(), Error> {
    let expected = described_len(entries);
    if expected != len {
        return Err(Error::IndexInconsistent {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Zero-pad `data` to a whole number of sectors and return the sector count.
/// Empty data stays empty and takes no sectors.
pub fn pad_to_sector_size(data: &mut Vec<u8>) -> Result<u16, Error> {
    let sectors = data.len().div_ceil(SECTOR_SIZE);
    let sectors = u16::try_from(sectors).map_err(|_| Error::Overflow)?;
    data.resize(sectors as usize * SECTOR_SIZE, 0);
    Ok(sectors)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{entry_range, pad_to_sector_size, read_index, validate, Header};
    use crate::test::ArchiveFixture;
    use crate::{Entry, Error, HEADER_SIZE};

    #[test]
    fn header_size() {
        assert_eq!(core::mem::size_of::<Header>(), 4);
        assert_eq!(HEADER_SIZE, 4);
    }

    #[test]
    fn read_entries() {
        let data = ArchiveFixture::new()
            .entry(&[1; 10], true)
            .entry(&[], false)
            .entry(&[2; 3000], false)
            .build();
        let entries = read_index(&data).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sectors(), 1);
        assert!(entries[0].is_compressed());
        assert!(!entries[1].is_present());
        assert_eq!(entries[2].sectors(), 2);
        assert!(!entries[2].is_compressed());
    }

    #[test]
    fn ranges_skip_absent_entries() {
        let entries = [Entry::new(1, false), Entry::new(0, false), Entry::new(2, true)];

        assert_eq!(entry_range(&entries, 0).unwrap(), 2048..4096);
        assert_eq!(entry_range(&entries, 1).unwrap(), 4096..4096);
        assert_eq!(entry_range(&entries, 2).unwrap(), 4096..8192);
        assert_eq!(
            entry_range(&entries, 3),
            Err(Error::EntryOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn truncated_table() {
        let mut data = vec![0; 8];
        data[0] = 4;
        assert!(matches!(
            read_index(&data),
            Err(Error::TruncatedData { .. })
        ));
        assert!(matches!(read_index(&[1, 0]), Err(Error::TruncatedData { .. })));
    }

    #[test]
    fn table_must_fit_in_header_sector() {
        let mut data = vec![0; 4096];
        data[..4].copy_from_slice(&512u32.to_le_bytes());
        assert!(matches!(read_index(&data), Err(Error::TooManyEntries(512))));
    }

    #[test]
    fn consistency() {
        let entries = [Entry::new(1, false), Entry::new(2, false)];
        assert!(validate(&entries, 2048 * 4).is_ok());
        assert_eq!(
            validate(&entries, 2048 * 3),
            Err(Error::IndexInconsistent {
                expected: 8192,
                actual: 6144
            })
        );
    }

    #[test]
    fn padding() {
        let mut data = vec![7; 2049];
        assert_eq!(pad_to_sector_size(&mut data), Ok(2));
        assert_eq!(data.len(), 4096);
        assert!(data[2049..].iter().all(|b| *b == 0));

        // Already aligned data is left alone
        assert_eq!(pad_to_sector_size(&mut data), Ok(2));
        assert_eq!(data.len(), 4096);

        let mut empty = vec![];
        assert_eq!(pad_to_sector_size(&mut empty), Ok(0));
        assert!(empty.is_empty());
    }
}
