#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};

use pzz_core::{compress, insert_header, pad_to_sector_size, DATA_OFFSET};

pub struct TestDir {
    tmpdir: tempfile::TempDir,
}

impl TestDir {
    pub fn new() -> io::Result<TestDir> {
        Ok(TestDir {
            tmpdir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.tmpdir.path().join(path)
    }
}

pub fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

pub fn model(fill: u8) -> Vec<u8> {
    let mut data = Vec::new();
    for tag in [0x0002_0000, 0x0000_0002, 0x0000_0009] {
        let mut child = vec![fill; 8];
        insert_header(&mut child, tag, 1);
        data.extend_from_slice(&child);
    }
    insert_header(&mut data, 0x1, 3);
    data
}

pub fn skeleton(bones: u32) -> Vec<u8> {
    let mut data = words(&[0; 4]);
    insert_header(&mut data, 0x4000_0001, bones);
    insert_header(&mut data, 0xC000_0000, 1);
    data
}

pub fn animation() -> Vec<u8> {
    let mut data = words(&[0; 6]);
    insert_header(&mut data, 0x8000_0000, 0x40);
    data
}

/// Lay out an archive from `(payload, compressed)` pairs. Empty payloads
/// become absent entries.
pub fn build_archive(entries: &[(Vec<u8>, bool)]) -> Vec<u8> {
    let mut archive = (entries.len() as u32).to_le_bytes().to_vec();
    let mut data = Vec::new();
    for (payload, compressed) in entries {
        let mut stored = if *compressed && !payload.is_empty() {
            compress(payload)
        } else {
            payload.clone()
        };
        let sectors = pad_to_sector_size(&mut stored).unwrap();
        let flags: u16 = if *compressed { 0x8000 } else { 0 };
        archive.extend_from_slice(&sectors.to_le_bytes());
        archive.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&stored);
    }
    archive.resize(DATA_OFFSET, 0);
    archive.extend_from_slice(&data);
    archive
}
