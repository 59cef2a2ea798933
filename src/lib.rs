//! # Codecs
//!
//! A family of lossless compression codecs for resource-constrained
//! targets: canonical Huffman, a 30-bit arithmetic (range) coder, greedy
//! LZ77, and LZCL — a composite LZ77 variant that packages each of its
//! internal streams with whichever of {Fixed, Arithmetic, Huffman, Golomb}
//! compresses it best. All four share the bit-addressed I/O in
//! [`bitstream`] and the universal integer codes in [`ucode`].
//!
//! Every codec exposes a one-shot pair (`compress`/`decompress`) and an
//! incremental decoder that parses just the header up front and then reads
//! header tables directly from the compressed stream on every symbol,
//! rather than materializing them — the low-memory path a constrained
//! decoder is expected to take.
//!
//! ## Example
//!
//! ```rust
//! use codecs::huffman;
//!
//! let input = b"the quick brown fox jumps over the lazy dog".repeat(4);
//! let compressed = huffman::compress(&input);
//! let decompressed = huffman::decompress(&compressed, input.len()).unwrap();
//! assert_eq!(decompressed, input);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

use alloc::vec::Vec;

pub mod arithmetic;
pub mod bitstream;
pub mod error;
pub mod fixed;
pub mod huffman;
pub mod lz77;
pub mod lzcl;
pub mod ucode;

pub use error::{CodecError, Result};

/// Sentinel returned by every incremental decoder at end-of-stream.
pub const END_TOKEN: u32 = 0xFFFF_FFFF;

/// Reads just the first Lomont-1(6) header field, which for all four
/// codecs is the uncompressed byte count of the payload.
pub fn get_decompressed_size(source: &[u8]) -> Result<u32> {
    let mut r = bitstream::BitReader::new(source);
    ucode::lomont1_decode(&mut r, 6, 0)
}

/// Unifies the four codecs' one-shot entry points behind a single trait,
/// so callers that don't care which codec was used can stay generic.
pub trait Codec {
    /// Compresses `input`, returning a self-describing byte stream.
    fn compress(input: &[u8]) -> Vec<u8>;

    /// Decompresses `input` into a freshly allocated buffer, failing if the
    /// declared size exceeds `out_capacity`.
    fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>>;
}

/// Marker type implementing [`Codec`] for the canonical Huffman codec.
pub struct Huffman;
impl Codec for Huffman {
    fn compress(input: &[u8]) -> Vec<u8> {
        huffman::compress(input)
    }
    fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
        huffman::decompress(input, out_capacity)
    }
}

/// Marker type implementing [`Codec`] for the arithmetic (range) codec.
pub struct Arithmetic;
impl Codec for Arithmetic {
    fn compress(input: &[u8]) -> Vec<u8> {
        arithmetic::compress(input)
    }
    fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
        arithmetic::decompress(input, out_capacity)
    }
}

/// Marker type implementing [`Codec`] for plain LZ77.
pub struct Lz77;
impl Codec for Lz77 {
    fn compress(input: &[u8]) -> Vec<u8> {
        lz77::compress(input)
    }
    fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
        lz77::decompress(input, out_capacity)
    }
}

/// Marker type implementing [`Codec`] for LZCL.
pub struct Lzcl;
impl Codec for Lzcl {
    fn compress(input: &[u8]) -> Vec<u8> {
        lzcl::compress(input)
    }
    fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
        lzcl::decompress(input, out_capacity)
    }
}
