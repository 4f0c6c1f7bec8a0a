//! The packed structs represent the on-disk format of the archive index
use core::fmt::Display;

use bytemuck::{Pod, Zeroable};

use crate::SECTOR_SIZE;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u16 {
        const COMPRESSED = 0x8000;
    }
}

/// One index record, stored little-endian directly after the file count
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Entry {
    /// Length of the entry's data in sectors; 0 for an absent entry
    pub sectors: u16,
    /// Raw flag word, only `0x8000` on its own means compressed
    pub flags: u16,
}

impl Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "sectors={} flags={:#06x} compressed={}",
            self.sectors(),
            self.flags().bits(),
            self.is_compressed()
        )
    }
}

impl Entry {
    pub fn new(sectors: u16, compressed: bool) -> Entry {
        let flags = if compressed {
            EntryFlags::COMPRESSED
        } else {
            EntryFlags::empty()
        };
        Entry {
            sectors: sectors.to_le(),
            flags: flags.bits().to_le(),
        }
    }

    pub fn sectors(&self) -> u16 {
        u16::from_le(self.sectors)
    }

    pub fn flags(&self) -> EntryFlags {
        EntryFlags::from_bits_retain(u16::from_le(self.flags))
    }

    /// Any other combination of bits, including `COMPRESSED` mixed with
    /// unknown bits, is read as uncompressed.
    pub fn is_compressed(&self) -> bool {
        self.flags() == EntryFlags::COMPRESSED
    }

    pub fn is_present(&self) -> bool {
        self.sectors() != 0
    }

    /// Size in bytes of the entry's data region
    pub fn size(&self) -> usize {
        self.sectors() as usize * SECTOR_SIZE
    }
}
