//! 30-bit range coder with E1/E2/E3 renormalization. The frequency table is
//! stored via BASC and is replayed from the stream on every decoded symbol
//! rather than materialized, matching the Huffman codec's low-memory
//! philosophy.

use alloc::vec::Vec;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::ucode::{basc_encode, basc_replay, lomont1_decode, lomont1_encode};
use crate::END_TOKEN;

const Q25: u64 = 1 << 29;
const Q50: u64 = 2 * Q25;
const Q75: u64 = 3 * Q25;
const Q100: u64 = 4 * Q25;
const MAX_TOTAL: u64 = Q25 - 1;

fn renormalize_encode(body: &mut BitWriter, low: &mut u64, high: &mut u64, scaling: &mut u32) {
    loop {
        if *high < Q50 {
            body.write_bit(false);
            for _ in 0..*scaling {
                body.write_bit(true);
            }
            *scaling = 0;
            *low *= 2;
            *high = *high * 2 + 1;
        } else if *low >= Q50 {
            body.write_bit(true);
            for _ in 0..*scaling {
                body.write_bit(false);
            }
            *scaling = 0;
            *low = (*low - Q50) * 2;
            *high = (*high - Q50) * 2 + 1;
        } else if *low >= Q25 && *high < Q75 {
            *scaling += 1;
            *low = (*low - Q25) * 2;
            *high = (*high - Q25) * 2 + 1;
        } else {
            break;
        }
    }
}

/// Writes a full arithmetic block: header, BASC frequency table, then the
/// range-coded body. `byte_length_field` is the declared symbol count.
pub fn encode_block(w: &mut BitWriter, symbols: &[u32], byte_length_field: u32) {
    lomont1_encode(w, byte_length_field, 6, 0);

    if symbols.is_empty() {
        lomont1_encode(w, 0, 6, 0); // total
        lomont1_encode(w, 0, 8, -1); // bitLength
        lomont1_encode(w, 0, 6, 0); // symbolMin
        lomont1_encode(w, 0, 6, 0); // symbolMax
        lomont1_encode(w, 0, 6, 0); // tableBitLength
        return;
    }

    let symbol_min = symbols.iter().copied().min().unwrap();
    let symbol_max = symbols.iter().copied().max().unwrap();
    let range = (symbol_max - symbol_min + 1) as usize;

    let mut counts = alloc::vec![0u32; range];
    for &s in symbols {
        counts[(s - symbol_min) as usize] += 1;
    }
    let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    debug_assert!(total <= MAX_TOTAL, "frequency total exceeds 2^29 - 1");

    let mut cum = alloc::vec![0u32; range + 1];
    for i in 0..range {
        cum[i + 1] = cum[i] + counts[i];
    }

    let mut table_w = BitWriter::new();
    basc_encode(&mut table_w, &counts);
    let table_bit_length = table_w.len() as u32;

    let mut body = BitWriter::new();
    let mut low: u64 = 0;
    let mut high: u64 = Q100 - 1;
    let mut scaling: u32 = 0;
    for &s in symbols {
        let idx = (s - symbol_min) as usize;
        let low_count = u64::from(cum[idx]);
        let high_count = u64::from(cum[idx + 1]);
        let step = (high - low + 1) / total;
        high = low + step * high_count - 1;
        low += step * low_count;
        renormalize_encode(&mut body, &mut low, &mut high, &mut scaling);
    }
    if low < Q25 {
        body.write_bit(false);
        body.write_bit(true);
        for _ in 0..=scaling {
            body.write_bit(true);
        }
    } else {
        body.write_bit(true);
        body.write_bit(false);
    }
    let bit_length = body.len() as u32;

    lomont1_encode(w, total as u32, 6, 0);
    lomont1_encode(w, bit_length, 8, -1);
    lomont1_encode(w, symbol_min, 6, 0);
    lomont1_encode(w, symbol_max, 6, 0);
    lomont1_encode(w, table_bit_length, 6, 0);
    w.append(&table_w);
    w.append(&body);
}

/// One-shot encode of a byte buffer.
#[must_use]
pub fn compress(input: &[u8]) -> Vec<u8> {
    let symbols: Vec<u32> = input.iter().map(|&b| u32::from(b)).collect();
    let mut w = BitWriter::new();
    encode_block(&mut w, &symbols, input.len() as u32);
    w.to_bytes()
}

/// Incremental decoder state. The frequency table is never materialized:
/// each call to [`ArithmeticDecoder::symbol`] replays it from the stream.
pub struct ArithmeticDecoder<'a> {
    data: &'a [u8],
    table_start_bit: usize,
    symbol_min: u32,
    total: u32,
    low: u64,
    high: u64,
    buffer: u64,
    body: BitReader<'a>,
    byte_length: u32,
    symbols_emitted: u32,
}

impl<'a> ArithmeticDecoder<'a> {
    pub fn start(data: &'a [u8]) -> Result<Self> {
        Self::start_at(data, 0)
    }

    /// Like [`ArithmeticDecoder::start`], but the header begins at an
    /// arbitrary bit offset rather than byte 0 — used to parse an arithmetic
    /// frame embedded inside another codec's stream.
    pub fn start_at(data: &'a [u8], start_bit: usize) -> Result<Self> {
        let mut r = BitReader::new(data);
        r.set_position(start_bit);
        let byte_length = lomont1_decode(&mut r, 6, 0)?;
        let total = lomont1_decode(&mut r, 6, 0)?;
        let bit_length = lomont1_decode(&mut r, 8, -1)?;
        let symbol_min = lomont1_decode(&mut r, 6, 0)?;
        let _symbol_max = lomont1_decode(&mut r, 6, 0)?;
        let table_bit_length = lomont1_decode(&mut r, 6, 0)?;

        if u64::from(total) > MAX_TOTAL {
            return Err(CodecError::CountsOverflow);
        }

        let table_start_bit = r.position();
        let bit_region_start = table_start_bit + table_bit_length as usize;
        if bit_region_start > r.bit_len() {
            return Err(CodecError::InputTooShort);
        }

        if total == 0 {
            return Ok(Self {
                data,
                table_start_bit,
                symbol_min,
                total,
                low: 0,
                high: Q100 - 1,
                buffer: 0,
                body: BitReader::with_bit_len(data, bit_region_start),
                byte_length,
                symbols_emitted: 0,
            });
        }

        let body_end = bit_region_start + bit_length as usize;
        if body_end > r.bit_len() {
            return Err(CodecError::InputTooShort);
        }
        let mut body = BitReader::with_bit_len(data, body_end);
        body.set_position(bit_region_start);
        let buffer = u64::from(body.read_saturating(31));

        Ok(Self {
            data,
            table_start_bit,
            symbol_min,
            total,
            low: 0,
            high: Q100 - 1,
            buffer,
            body,
            byte_length,
            symbols_emitted: 0,
        })
    }

    #[must_use]
    pub const fn declared_len(&self) -> u32 {
        self.byte_length
    }

    fn renormalize(&mut self) {
        loop {
            if self.high < Q50 {
                self.low *= 2;
                self.high = self.high * 2 + 1;
                self.buffer = self.buffer * 2 + u64::from(self.body.read_saturating(1));
            } else if self.low >= Q50 {
                self.low = (self.low - Q50) * 2;
                self.high = (self.high - Q50) * 2 + 1;
                self.buffer = (self.buffer - Q50) * 2 + u64::from(self.body.read_saturating(1));
            } else if self.low >= Q25 && self.high < Q75 {
                self.low = (self.low - Q25) * 2;
                self.high = (self.high - Q25) * 2 + 1;
                self.buffer = (self.buffer - Q25) * 2 + u64::from(self.body.read_saturating(1));
            } else {
                break;
            }
        }
    }

    /// Decodes the next symbol, or `END_TOKEN` once the declared count is
    /// reached (or immediately, for a header-only empty stream).
    pub fn symbol(&mut self) -> Result<u32> {
        if self.total == 0 {
            return Ok(END_TOKEN);
        }
        if self.byte_length != END_TOKEN && self.symbols_emitted >= self.byte_length {
            return Ok(END_TOKEN);
        }

        let total = u64::from(self.total);
        let step = (self.high - self.low + 1) / total;
        let target = (self.buffer - self.low) / step;

        let full = BitReader::new(self.data);
        let symbol_min = self.symbol_min;
        let mut running: u64 = 0;
        let mut found: Option<(u32, u64, u64)> = None;
        basc_replay(&full, self.table_start_bit, |i, count| {
            let prev = running;
            running += u64::from(count);
            if running > target {
                found = Some((symbol_min + i as u32, prev, running));
                true
            } else {
                false
            }
        })?;
        let (symbol, low_count, high_count) = found.ok_or(CodecError::InvalidHeader)?;

        self.high = self.low + step * high_count - 1;
        self.low += step * low_count;
        self.renormalize();
        self.symbols_emitted += 1;
        Ok(symbol)
    }
}

/// One-shot decode into a freshly allocated buffer.
pub fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
    let mut dec = ArithmeticDecoder::start(input)?;
    let declared = dec.declared_len();
    if declared != END_TOKEN && declared as usize > out_capacity {
        return Err(CodecError::CapacityExceeded);
    }
    let mut out = Vec::with_capacity(declared.min(out_capacity as u32) as usize);
    loop {
        let sym = dec.symbol()?;
        if sym == END_TOKEN {
            break;
        }
        out.push(sym as u8);
    }
    Ok(out)
}
