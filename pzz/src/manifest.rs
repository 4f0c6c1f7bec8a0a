//! Description of an unpacked archive, written next to the extracted files
use std::fs;
use std::path::{Path, PathBuf};

use pzz_core::PayloadKind;
use serde::{Deserialize, Serialize};

use crate::{write_atomic, Error, ResultPathExt};

pub const MANIFEST_NAME: &str = "manifest.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Manifest {
    /// File name of the archive the entries were extracted from
    pub archive: String,
    #[serde(default, rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub kind: String,
    /// Whether the entry was stored compressed, and will be again on patch
    pub compressed: bool,
    /// Extracted file, relative to the manifest
    pub file: String,
    /// Hex digest of the extracted payload
    pub blake3: String,
    /// Index of the skeleton entry paired with a model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<usize>,
}

impl Manifest {
    pub fn open(path: impl AsRef<Path>) -> Result<Manifest, Error> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_path(path)?;
        Ok(toml::from_str(&s)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        write_atomic(path, toml::to_string(self)?.as_bytes())
    }

    pub fn entry(&self, index: usize) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }
}

impl ManifestEntry {
    pub fn new(index: usize, kind: PayloadKind, compressed: bool, file: String, data: &[u8]) -> ManifestEntry {
        ManifestEntry {
            index,
            kind: kind.name().to_string(),
            compressed,
            file,
            blake3: blake3::hash(data).to_hex().to_string(),
            skeleton: None,
        }
    }

    pub fn digest(&self) -> Result<blake3::Hash, Error> {
        blake3::Hash::from_hex(&self.blake3).map_err(|_| Error::InvalidHash {
            file: PathBuf::from(&self.file),
        })
    }
}

/// Name of an extracted entry: `<archive stem>_<index>.<extension>`
pub fn entry_file_name(stem: &str, index: usize, kind: PayloadKind) -> String {
    format!("{}_{:03}.{}", stem, index, kind.extension())
}
