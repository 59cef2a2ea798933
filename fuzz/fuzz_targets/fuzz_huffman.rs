#![no_main]

use codecs::huffman::{compress, decompress};
use libfuzzer_sys::fuzz_target;

/// Verifies that the decoder safely handles arbitrary, potentially malformed
/// input.
///
/// # Invariant
/// The decoder must return either `Ok(_)` or `Err(_)`. It must **never**
/// panic or cause memory safety violations, regardless of the input data.
fn verify_decompression_robustness(data: &[u8]) {
    let _ = decompress(data, data.len() + 1024);
}

/// Verifies the lossless round-trip property.
///
/// # Panics
/// Panics if the decompressed output does not bit-match the input, or if
/// decompression returns an error for data this crate itself produced.
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
