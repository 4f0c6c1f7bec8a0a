#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate pzz_core;

fuzz_target!(|data: &[u8]| {
    let _result = pzz_core::decompress(data);

    let even = &data[..data.len() & !1];
    let compressed = pzz_core::compress(even);
    assert_eq!(pzz_core::decompress(&compressed).as_deref(), Ok(even));
});
