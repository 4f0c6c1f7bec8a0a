//! In-memory archive: unpacking entries and patching them in place
use alloc::vec::Vec;
use core::ops::Range;

use crate::{
    compress, decompress, entry_range, pad_to_sector_size, read_index, validate, Entry, Error,
    PayloadKind, DATA_OFFSET, ENTRY_SIZE, HEADER_SIZE,
};

/// An archive held in memory. All offsets are derived from the entry table
/// inside the buffer itself, never from a cached copy, so they stay correct
/// while entries are being resized.
#[derive(Debug, Clone)]
pub struct ArchiveBuf {
    data: Vec<u8>,
}

/// New contents for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub index: usize,
    /// Decompressed payload
    pub payload: Vec<u8>,
    /// Store the payload compressed. Callers pass the flag the entry was
    /// unpacked with.
    pub compressed: bool,
}

/// A present entry after decompression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedEntry {
    pub index: usize,
    pub kind: PayloadKind,
    pub compressed: bool,
    pub data: Vec<u8>,
}

/// Entries of an archive in file order; absent entries are left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unpacked {
    pub entries: Vec<UnpackedEntry>,
}

/// Recognized entries grouped by their position in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryGroup<'a> {
    /// A model directly followed by its skeleton
    Rigged {
        model: &'a UnpackedEntry,
        skeleton: &'a UnpackedEntry,
    },
    /// A model with no skeleton after it
    Model(&'a UnpackedEntry),
    /// Anything else, including animations: nothing in the format ties them
    /// to a skeleton
    Loose(&'a UnpackedEntry),
}

impl Unpacked {
    pub fn get(&self, index: usize) -> Option<&UnpackedEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    /// Pair every model with the skeleton stored right after it. Skeletons
    /// are only ever linked to a model by adjacency. Unrecognized entries
    /// are skipped.
    pub fn groups(&self) -> Vec<EntryGroup<'_>> {
        let mut groups = Vec::new();
        let mut entries = self.entries.iter().peekable();
        while let Some(entry) = entries.next() {
            match entry.kind {
                PayloadKind::Model => {
                    match entries.next_if(|next| next.kind == PayloadKind::Skeleton) {
                        Some(skeleton) => groups.push(EntryGroup::Rigged {
                            model: entry,
                            skeleton,
                        }),
                        None => groups.push(EntryGroup::Model(entry)),
                    }
                }
                PayloadKind::Unrecognized => {}
                _ => groups.push(EntryGroup::Loose(entry)),
            }
        }
        groups
    }
}

impl ArchiveBuf {
    /// Wrap archive bytes, checking that the entry table can be read
    pub fn new(data: Vec<u8>) -> Result<ArchiveBuf, Error> {
        read_index(&data)?;
        Ok(ArchiveBuf { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current entry table
    pub fn entries(&self) -> Result<Vec<Entry>, Error> {
        read_index(&self.data)
    }

    /// Check that the entry table accounts for every byte of the archive
    pub fn validate(&self) -> Result<(), Error> {
        validate(&self.entries()?, self.data.len())
    }

    pub fn entry_range(&self, index: usize) -> Result<Range<usize>, Error> {
        let range = entry_range(&self.entries()?, index)?;
        if range.end > self.data.len() {
            return Err(Error::truncated(range.start, range.len(), self.data.len()));
        }
        Ok(range)
    }

    /// Stored bytes of an entry, sector padding included
    pub fn entry_data(&self, index: usize) -> Result<&[u8], Error> {
        let range = self.entry_range(index)?;
        Ok(&self.data[range])
    }

    /// Payload of one entry, decompressed if it is stored compressed.
    /// Returns `None` for an absent entry.
    pub fn read_entry(&self, index: usize) -> Result<Option<UnpackedEntry>, Error> {
        let entries = self.entries()?;
        let entry = entries.get(index).ok_or(Error::EntryOutOfRange {
            index,
            count: entries.len(),
        })?;
        if !entry.is_present() {
            return Ok(None);
        }
        let stored = self.entry_data(index)?;
        Ok(Some(unpack_entry(index, entry, stored)?))
    }

    /// Decompress and classify every present entry
    pub fn unpack(&self) -> Result<Unpacked, Error> {
        let entries = self.entries()?;
        let mut unpacked = Unpacked::default();

        let mut offset = DATA_OFFSET;
        for (index, entry) in entries.iter().enumerate() {
            let range = offset..offset + entry.size();
            offset = range.end;
            if !entry.is_present() {
                continue;
            }

            let stored = self
                .data
                .get(range.clone())
                .ok_or_else(|| Error::truncated(range.start, range.len(), self.data.len()))?;
            unpacked.entries.push(unpack_entry(index, entry, stored)?);
        }

        Ok(unpacked)
    }

    /// Replace the contents of one entry, shifting everything stored after
    /// it. Returns the rewritten index record.
    pub fn replace(&mut self, replacement: Replacement) -> Result<Entry, Error> {
        let Replacement {
            index,
            payload,
            compressed,
        } = replacement;

        let mut stored = if compressed {
            compress(&payload)
        } else {
            payload
        };
        let sectors = pad_to_sector_size(&mut stored)?;

        // Earlier replacements may have moved this entry
        let range = self.entry_range(index)?;
        self.data.splice(range, stored);

        let entry = Entry::new(sectors, compressed);
        let position = HEADER_SIZE + index * ENTRY_SIZE;
        self.data[position..position + ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&entry));
        Ok(entry)
    }

    /// Apply a batch of replacements. The archive is validated first; an
    /// inconsistent table would make every offset computed from it wrong.
    pub fn patch<I>(&mut self, replacements: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Replacement>,
    {
        self.validate()?;
        for replacement in replacements {
            self.replace(replacement)?;
        }
        Ok(())
    }
}

fn unpack_entry(index: usize, entry: &Entry, stored: &[u8]) -> Result<UnpackedEntry, Error> {
    let compressed = entry.is_compressed();
    let data = if compressed {
        decompress(stored)?
    } else {
        stored.to_vec()
    };

    Ok(UnpackedEntry {
        index,
        kind: PayloadKind::classify(&data),
        compressed,
        data,
    })
}
