#![no_main]

use codecs::bitstream::{BitReader, BitWriter};
use codecs::ucode::{basc_decode, basc_encode, lomont1_decode, lomont1_encode};
use libfuzzer_sys::fuzz_target;

/// Derives a small list of u32 values from arbitrary fuzzer bytes so both
/// Lomont-1 and BASC get exercised on inputs with no particular structure.
fn values_from(data: &[u8]) -> Vec<u32> {
    data.chunks(4)
        .map(|c| {
            let mut buf = [0u8; 4];
            buf[..c.len()].copy_from_slice(c);
            u32::from_le_bytes(buf)
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let values = values_from(data);

    for &v in &values {
        let mut w = BitWriter::new();
        lomont1_encode(&mut w, v, 6, 0);
        let bytes = w.to_bytes();
        let mut r = BitReader::new(&bytes);
        match lomont1_decode(&mut r, 6, 0) {
            Ok(decoded) => assert_eq!(decoded, v, "lomont1 round-trip mismatch for {v}"),
            Err(e) => panic!("lomont1 decoder rejected its own output for {v}: {e:?}"),
        }
    }

    let mut w = BitWriter::new();
    basc_encode(&mut w, &values);
    let bytes = w.to_bytes();
    let mut r = BitReader::new(&bytes);
    match basc_decode(&mut r) {
        Ok(decoded) => assert_eq!(decoded, values, "basc round-trip mismatch"),
        Err(e) => panic!("basc decoder rejected its own output: {e:?}"),
    }
});
