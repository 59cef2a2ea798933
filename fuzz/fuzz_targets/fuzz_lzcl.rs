#![no_main]

use codecs::lzcl::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fn verify_decompression_robustness(data: &[u8]) {
    let _ = decompress(data, data.len() + 1024);
}

fn verify_round_trip(data: &[u8]) {
    let compressed = compress(data);
    match decompress(&compressed, data.len()) {
        Ok(decompressed) => {
            if decompressed != data {
                panic!(
                    "round-trip mismatch: input len {}, compressed len {}, decompressed len {}",
                    data.len(),
                    compressed.len(),
                    decompressed.len()
                );
            }
        }
        Err(e) => panic!("decoder rejected its own compressed output: {e:?}"),
    }
}

fuzz_target!(|data: &[u8]| {
    verify_decompression_robustness(data);
    verify_round_trip(data);
});
