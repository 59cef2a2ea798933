//! Integration tests for the LZCL composite codec (LZ77 matches, each
//! sub-stream independently entropy-coded).

use codecs::lzcl::{compress, decompress, required_dest_len, LzclDecoder};

#[track_caller]
fn assert_round_trip(input: &[u8]) {
    let compressed = compress(input);
    let out = decompress(&compressed, input.len()).expect("decode of own output must succeed");
    assert_eq!(out, input, "round-trip mismatch for {} byte input", input.len());
}

// --- Basic Sanity & Boundaries (Tests 1-5) ---

#[test]
fn t01_empty_input_round_trips() {
    assert_round_trip(&[]);
}

#[test]
fn t02_single_byte_round_trips() {
    assert_round_trip(b"Q");
}

#[test]
fn t03_all_literals_no_matches_round_trips() {
    let input: Vec<u8> = (0..80u32).map(|i| (i * 59 + 3) as u8).collect();
    assert_round_trip(&input);
}

#[test]
fn t04_long_repeated_run_compresses_hard() {
    let input = vec![0x55u8; 400];
    let compressed = compress(&input);
    assert!((compressed.len() as f64) < (input.len() as f64) * 0.3);
    assert_round_trip(&input);
}

#[test]
fn t05_all_256_byte_values_round_trip() {
    let input: Vec<u8> = (0..=255u8).collect();
    assert_round_trip(&input);
}

// --- Sub-Codec Selection & Packaging (Tests 6-9) ---

#[test]
fn t06_highly_repetitive_pattern_beats_half_the_raw_size() {
    let input = b"abcabcabcabcabcabcabcabcabcabc".repeat(6);
    let compressed = compress(&input);
    assert!((compressed.len() as f64) < (input.len() as f64) * 0.5);
    assert_round_trip(&input);
}

#[test]
fn t07_mixed_text_with_occasional_repeats_round_trips() {
    let input = b"the quick brown fox jumps over the lazy dog, and the fox runs again".repeat(4);
    assert_round_trip(&input);
}

#[test]
fn t08_decision_run_encoding_handles_long_alternation() {
    // Alternating match/literal decisions stress the run-length path
    // independently from a long uniform run.
    let input = b"xyxyxyxyxyxyxyxyxyxyxyxyxyxyxyxyxyxyxyxy".to_vec();
    assert_round_trip(&input);
}

#[test]
fn t09_compressing_twice_is_byte_identical() {
    let input = b"lzcl determinism check across two compress calls".repeat(2);
    assert_eq!(compress(&input), compress(&input));
}

// --- Incremental Decoder & Cyclic Buffer (Tests 10-12) ---

#[test]
fn t10_required_dest_len_is_sufficient_for_incremental_decode() {
    let input = b"the quick brown fox jumps over the lazy dog repeatedly".repeat(3);
    let compressed = compress(&input);
    let required = required_dest_len(&compressed).unwrap() as usize;
    let mut dec = LzclDecoder::start(&compressed, required).unwrap();
    let mut out = Vec::new();
    let mut produced = 0u32;
    loop {
        let written = dec.block().unwrap();
        if written == codecs::END_TOKEN {
            break;
        }
        for k in 0..written {
            out.push(dec.byte_at(produced + k));
        }
        produced += written;
    }
    assert_eq!(out, input);
}

#[test]
fn t11_declared_len_matches_input_length() {
    let input = b"declared length sanity check for lzcl";
    let compressed = compress(input);
    let required = required_dest_len(&compressed).unwrap() as usize;
    let dec = LzclDecoder::start(&compressed, required).unwrap();
    assert_eq!(dec.declared_len() as usize, input.len());
}

#[test]
fn t12_undersized_dest_len_is_rejected() {
    let input = vec![b'q'; 60];
    let compressed = compress(&input);
    let required = required_dest_len(&compressed).unwrap() as usize;
    assert!(LzclDecoder::start(&compressed, required - 1).is_err());
}

// --- Decompression Error Handling (Tests 13-15) ---

#[test]
fn t13_capacity_exceeded_is_detected() {
    let input = b"lzcl capacity probe text".repeat(4);
    let compressed = compress(&input);
    assert!(decompress(&compressed, 3).is_err());
}

#[test]
fn t14_truncated_stream_is_rejected_not_panicking() {
    let input = b"truncate this compressed lzcl stream partway through".repeat(3);
    let compressed = compress(&input);
    let truncated = &compressed[..compressed.len() / 2];
    assert!(decompress(truncated, input.len()).is_err());
}

#[test]
fn t15_empty_buffer_as_input_to_decompress_is_rejected() {
    assert!(decompress(&[], 10).is_err());
}
