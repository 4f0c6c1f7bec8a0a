use std::fs;
use std::path::Path;

use pzz_core::{compress, decompress, outline, EntryGroup, Replacement};
use tracing::{debug, info, warn};

use crate::{
    entry_file_name, write_atomic, ArchiveFile, Error, Manifest, ManifestEntry, ResultPathExt,
    MANIFEST_NAME,
};

/// Print one line per entry, optionally followed by the chunk outline of
/// each recognized payload
pub fn list(archive_path: impl AsRef<Path>, chunks: bool) -> Result<(), Error> {
    let file = ArchiveFile::open(archive_path)?;
    let archive = file.archive();

    for (index, entry) in archive.entries()?.iter().enumerate() {
        let Some(unpacked) = archive.read_entry(index)? else {
            println!("{:3}: absent", index);
            continue;
        };

        println!(
            "{:3}: {:4} sectors {:10} {:4} {} bytes",
            index,
            entry.sectors(),
            if unpacked.compressed { "compressed" } else { "raw" },
            unpacked.kind,
            unpacked.data.len()
        );

        if chunks && unpacked.kind.is_recognized() {
            match outline(unpacked.kind, &unpacked.data) {
                Ok(lines) => {
                    for line in lines {
                        println!(
                            "     {:indent$}{} count={} size={:#x} @ {:#x}",
                            "",
                            line.name,
                            line.header.count,
                            line.header.size,
                            line.offset,
                            indent = line.depth * 2
                        );
                    }
                }
                Err(err) => warn!(index, "cannot outline entry: {}", err),
            }
        }
    }

    Ok(())
}

/// Extract the payloads of an archive into `base_dir` and describe them in a
/// manifest. Unrecognized payloads are only extracted with `all`.
pub fn unpack(
    archive_path: impl AsRef<Path>,
    base_dir: impl AsRef<Path>,
    all: bool,
) -> Result<Manifest, Error> {
    let archive_path = archive_path.as_ref();
    let base_dir = base_dir.as_ref();

    let file = ArchiveFile::open(archive_path)?;
    let unpacked = file.archive().unpack()?;

    fs::create_dir_all(base_dir).with_path(base_dir)?;

    let stem = archive_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut manifest = Manifest {
        archive: archive_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        entries: Vec::new(),
    };

    for entry in unpacked.entries.iter() {
        if !all && !entry.kind.is_recognized() {
            debug!(index = entry.index, "skipping unrecognized entry");
            continue;
        }

        let name = entry_file_name(&stem, entry.index, entry.kind);
        write_atomic(base_dir.join(&name), &entry.data)?;
        debug!(index = entry.index, kind = %entry.kind, file = %name, "extracted entry");

        manifest.entries.push(ManifestEntry::new(
            entry.index,
            entry.kind,
            entry.compressed,
            name,
            &entry.data,
        ));
    }

    for group in unpacked.groups() {
        if let EntryGroup::Rigged { model, skeleton } = group {
            debug!(model = model.index, skeleton = skeleton.index, "paired skeleton");
            if let Some(entry) = manifest
                .entries
                .iter_mut()
                .find(|entry| entry.index == model.index)
            {
                entry.skeleton = Some(skeleton.index);
            }
        }
    }

    manifest.save(base_dir.join(MANIFEST_NAME))?;
    info!(
        archive = %archive_path.display(),
        extracted = manifest.entries.len(),
        present = unpacked.entries.len(),
        "unpacked archive"
    );
    Ok(manifest)
}

/// Write the files listed in `base_dir`'s manifest back into the archive.
///
/// Files whose digest still matches the manifest are left alone unless
/// `force` is set. The archive is only rewritten when something changed.
/// Returns the number of replaced entries.
pub fn patch(
    archive_path: impl AsRef<Path>,
    base_dir: impl AsRef<Path>,
    force: bool,
) -> Result<usize, Error> {
    let base_dir = base_dir.as_ref();

    let mut file = ArchiveFile::open(archive_path)?;
    file.archive().validate()?;
    let manifest = Manifest::open(base_dir.join(MANIFEST_NAME))?;

    let mut replacements = Vec::new();
    for entry in manifest.entries.iter() {
        let path = base_dir.join(&entry.file);
        let payload = fs::read(&path).with_path(&path)?;

        if !force && blake3::hash(&payload) == entry.digest()? {
            debug!(index = entry.index, file = %entry.file, "unchanged");
            continue;
        }
        if entry.compressed && payload.len() % 2 != 0 {
            warn!(
                index = entry.index,
                file = %entry.file,
                "odd length payload, the last byte is lost on compression"
            );
        }

        info!(index = entry.index, file = %entry.file, len = payload.len(), "replacing entry");
        replacements.push(Replacement {
            index: entry.index,
            payload,
            compressed: entry.compressed,
        });
    }

    if replacements.is_empty() {
        info!(archive = %file.path().display(), "nothing to patch");
        return Ok(0);
    }

    replacements.sort_by_key(|replacement| replacement.index);
    let count = replacements.len();
    file.archive_mut().patch(replacements)?;
    file.save()?;

    info!(archive = %file.path().display(), replaced = count, len = file.archive().len(), "patched archive");
    Ok(count)
}

/// Compress a raw file with the archive codec
pub fn compress_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), Error> {
    let input = input.as_ref();
    let data = fs::read(input).with_path(input)?;
    if data.len() % 2 != 0 {
        warn!(file = %input.display(), "odd length input, the last byte is lost on compression");
    }

    let compressed = compress(&data);
    write_atomic(output, &compressed)?;
    info!(input = data.len(), output = compressed.len(), "compressed");
    Ok(())
}

/// Decompress a stream produced by the archive codec
pub fn decompress_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), Error> {
    let input = input.as_ref();
    let data = fs::read(input).with_path(input)?;

    let decompressed = decompress(&data)?;
    write_atomic(output, &decompressed)?;
    info!(input = data.len(), output = decompressed.len(), "decompressed");
    Ok(())
}
