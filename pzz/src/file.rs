use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pzz_core::ArchiveBuf;
use tracing::debug;

use crate::{Error, ResultPathExt};

/// An archive read from disk. It is only written back by an explicit
/// [`ArchiveFile::save`].
#[derive(Debug)]
pub struct ArchiveFile {
    path: PathBuf,
    archive: ArchiveBuf,
}

impl ArchiveFile {
    /// Read a whole archive into memory. There is no way to create an archive
    /// from scratch, so a missing file is [`Error::ArchiveNotFound`].
    pub fn open(path: impl AsRef<Path>) -> Result<ArchiveFile, Error> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ArchiveNotFound(path));
            }
            Err(err) => return Err(err).with_path(&path),
        };
        debug!(path = %path.display(), len = data.len(), "read archive");

        let archive = ArchiveBuf::new(data)?;
        Ok(ArchiveFile { path, archive })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive(&self) -> &ArchiveBuf {
        &self.archive
    }

    pub fn archive_mut(&mut self) -> &mut ArchiveBuf {
        &mut self.archive
    }

    /// Write the archive back to the path it was read from
    pub fn save(&self) -> Result<(), Error> {
        write_atomic(&self.path, self.archive.as_bytes())?;
        debug!(path = %self.path.display(), len = self.archive.len(), "wrote archive");
        Ok(())
    }
}

/// Sibling of `target` used while writing it (`.pzz.<file name>`)
fn temp_path(target: &Path) -> Result<PathBuf, Error> {
    let file_name = target.file_name().ok_or_else(|| Error::Io {
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        path: Some(target.to_path_buf()),
    })?;

    let mut tmp_name = OsString::from(".pzz.");
    tmp_name.push(file_name);
    Ok(target.with_file_name(tmp_name))
}

/// Write `data` to a temporary file next to `target`, then rename it into
/// place. The temporary file is removed if either step fails.
pub fn write_atomic(target: impl AsRef<Path>, data: &[u8]) -> Result<(), Error> {
    let target = target.as_ref();
    let tmp_path = temp_path(target)?;

    if let Err(err) = fs::write(&tmp_path, data) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_path(&tmp_path);
    }
    if let Err(err) = fs::rename(&tmp_path, target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_path(target);
    }
    Ok(())
}
