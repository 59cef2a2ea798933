//! Fixed-size codec: writes every symbol in a header-declared bit width.
//! The simplest of the four sub-codecs LZCL can choose per sub-stream.

use alloc::vec::Vec;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::Result;
use crate::ucode::{bit_length, lomont1_decode, lomont1_encode};

/// Encodes `values` as a length header, a bits-per-symbol header, then each
/// value written at that fixed width.
pub fn encode(w: &mut BitWriter, values: &[u32]) {
    lomont1_encode(w, values.len() as u32, 6, 0);
    let max_bits = values.iter().copied().map(bit_length).max().unwrap_or(0);
    let bits_per_symbol = max_bits.max(1);
    lomont1_encode(w, bits_per_symbol, 6, 0);
    for &v in values {
        w.write(v, bits_per_symbol);
    }
}

/// Decodes a stream produced by [`encode`].
pub fn decode(r: &mut BitReader<'_>) -> Result<Vec<u32>> {
    let len = lomont1_decode(r, 6, 0)? as usize;
    let bits_per_symbol = lomont1_decode(r, 6, 0)?;
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(r.read(bits_per_symbol)?);
    }
    Ok(values)
}
