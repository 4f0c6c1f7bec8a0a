#![no_std]
extern crate alloc;

use core::mem;

pub use crate::archive::{ArchiveBuf, EntryGroup, Replacement, Unpacked, UnpackedEntry};
pub use crate::chunk::{insert_header, ChunkHeader, Chunks};
pub use crate::compression::{compress, decompress};
pub use crate::entry::{Entry, EntryFlags};
pub use crate::error::Error;
pub use crate::header::{
    described_len, entry_range, pad_to_sector_size, read_index, validate, Header,
};
pub use crate::kind::{
    outline, AnimationTag, ChunkSummary, ModelTag, PayloadKind, SkeletonTag, TagName,
};

mod archive;
mod chunk;
mod compression;
mod entry;
mod error;
mod header;
mod kind;

/// Allocation unit of the data region
pub const SECTOR_SIZE: usize = 0x800;
/// The first sector holds the header and entry table, data follows
pub const DATA_OFFSET: usize = SECTOR_SIZE;
pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const ENTRY_SIZE: usize = mem::size_of::<Entry>();
pub const MAX_ENTRIES: usize = (SECTOR_SIZE - HEADER_SIZE) / ENTRY_SIZE;
pub const CHUNK_HEADER_SIZE: usize = 12;

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> Result<u32, Error> {
    buf.get(offset..offset.saturating_add(4))
        .and_then(|bytes| bytes.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| Error::truncated(offset, 4, buf.len()))
}
