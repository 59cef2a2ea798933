//! Tests that hold across every codec in the family: the shared `Codec`
//! trait, the `get_decompressed_size` peek helper, and comparable behavior
//! on the same corpus of scenarios.

use codecs::{arithmetic, get_decompressed_size, huffman, lz77, lzcl, Arithmetic, Codec, Huffman, Lz77, Lzcl};

fn scenarios() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("single_byte", b"Q".to_vec()),
        ("zeroes", vec![0u8; 256]),
        ("text", b"the quick brown fox jumps over the lazy dog ".repeat(10)),
        ("repeated_pattern", b"abcabcabcabcabcabcabcabcabcabc".repeat(4)),
        ("all_byte_values", (0..=255u8).collect()),
        (
            "pseudo_random",
            (0..512u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect(),
        ),
    ]
}

// --- Round-Trip Law Across Every Codec (Tests 1-4) ---

#[track_caller]
fn assert_codec_round_trips<C: Codec>(name: &str, input: &[u8]) {
    let compressed = C::compress(input);
    let out = C::decompress(&compressed, input.len())
        .unwrap_or_else(|e| panic!("{name} failed to decode its own output: {e:?}"));
    assert_eq!(out, input, "{name} round-trip mismatch");
}

#[test]
fn t01_huffman_round_trips_every_scenario() {
    for (name, input) in scenarios() {
        assert_codec_round_trips::<Huffman>(name, &input);
    }
}

#[test]
fn t02_arithmetic_round_trips_every_scenario() {
    for (name, input) in scenarios() {
        assert_codec_round_trips::<Arithmetic>(name, &input);
    }
}

#[test]
fn t03_lz77_round_trips_every_scenario() {
    for (name, input) in scenarios() {
        assert_codec_round_trips::<Lz77>(name, &input);
    }
}

#[test]
fn t04_lzcl_round_trips_every_scenario() {
    for (name, input) in scenarios() {
        assert_codec_round_trips::<Lzcl>(name, &input);
    }
}

// --- get_decompressed_size Peek (Tests 5-7) ---

#[test]
fn t05_get_decompressed_size_matches_input_len_for_every_codec() {
    let input = b"peeking at the header should never require decoding the body".repeat(2);
    for compressed in [
        huffman::compress(&input),
        arithmetic::compress(&input),
        lz77::compress(&input),
        lzcl::compress(&input),
    ] {
        assert_eq!(get_decompressed_size(&compressed).unwrap() as usize, input.len());
    }
}

#[test]
fn t06_get_decompressed_size_on_empty_input_is_zero() {
    for compressed in [
        huffman::compress(&[]),
        arithmetic::compress(&[]),
        lz77::compress(&[]),
        lzcl::compress(&[]),
    ] {
        assert_eq!(get_decompressed_size(&compressed).unwrap(), 0);
    }
}

#[test]
fn t07_get_decompressed_size_on_empty_buffer_is_an_error() {
    assert!(get_decompressed_size(&[]).is_err());
}

// --- Ratio Sanity Across Codecs On a Shared Corpus (Tests 8-9) ---

#[test]
fn t08_every_codec_shrinks_a_long_repeated_run() {
    let input = vec![b'r'; 512];
    for (name, compressed_len) in [
        ("huffman", huffman::compress(&input).len()),
        ("arithmetic", arithmetic::compress(&input).len()),
        ("lz77", lz77::compress(&input).len()),
        ("lzcl", lzcl::compress(&input).len()),
    ] {
        assert!(
            compressed_len < input.len(),
            "{name} failed to shrink a 512-byte single-symbol run ({compressed_len} bytes)"
        );
    }
}

#[test]
fn t09_no_codec_catastrophically_expands_incompressible_data() {
    let input: Vec<u8> = (0..256u32).map(|i| (i * 97 + 13) as u8).collect();
    for (name, compressed_len) in [
        ("huffman", huffman::compress(&input).len()),
        ("arithmetic", arithmetic::compress(&input).len()),
        ("lz77", lz77::compress(&input).len()),
        ("lzcl", lzcl::compress(&input).len()),
    ] {
        assert!(
            compressed_len <= input.len() * 2 + 64,
            "{name} expanded {} bytes into {compressed_len} bytes",
            input.len()
        );
    }
}
