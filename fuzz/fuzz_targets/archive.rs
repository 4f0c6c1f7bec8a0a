#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate pzz_core;

use pzz_core::{outline, ArchiveBuf};

fuzz_target!(|data: &[u8]| {
    let archive = match ArchiveBuf::new(data.to_vec()) {
        Ok(archive) => archive,
        Err(_) => return,
    };

    if let Ok(unpacked) = archive.unpack() {
        for entry in unpacked.entries.iter() {
            let _result = outline(entry.kind, &entry.data);
        }
        let _groups = unpacked.groups();
    }
});
