mod bin;
mod file;
mod manifest;

pub use bin::*;
pub use file::*;
pub use manifest::*;

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pzz_core::Error),

    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error(
        "I/O error{}",
        .path.as_ref().map(|path| format!(" on {}", path.display())).unwrap_or_default()
    )]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("Failed to parse manifest")]
    ManifestRead(#[from] toml::de::Error),

    #[error("Failed to serialize manifest")]
    ManifestWrite(#[from] toml::ser::Error),

    #[error("Invalid blake3 digest for {}", .file.display())]
    InvalidHash { file: PathBuf },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        let mut source = self.source();
        while let Some(err) = source {
            writeln!(f, "\tCaused by: {err}")?;
            source = err.source();
        }

        Ok(())
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Error {
        Error::Io { source, path: None }
    }
}

/// Attach the path an I/O operation was working on
pub(crate) trait ResultPathExt<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T, Error>;
}

impl<T> ResultPathExt<T> for Result<T, io::Error> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T, Error> {
        self.map_err(|source| Error::Io {
            source,
            path: Some(path.as_ref().to_path_buf()),
        })
    }
}
