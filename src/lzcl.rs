//! LZCL: the composite LZ77 variant. Reuses [`crate::lz77::run_matcher`] to
//! produce the decisions/literals/distances/lengths model, then packages
//! each of those as an independently sized sub-stream, each compressed with
//! whichever of {Fixed, Arithmetic, Huffman, Golomb} is shortest.

use alloc::vec::Vec;

use crate::arithmetic::{self, ArithmeticDecoder};
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::fixed;
use crate::huffman::{self, HuffmanDecoder};
use crate::lz77::{self, pack_token, unpack_token, MAX_LENGTH};
use crate::ucode::{golomb_decode, golomb_encode, golomb_optimal_m, lomont1_decode, lomont1_encode};
use crate::END_TOKEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubCodecTag {
    Fixed = 0,
    Arithmetic = 1,
    Huffman = 2,
    Golomb = 3,
}

impl SubCodecTag {
    const fn from_u32(v: u32) -> Result<Self> {
        match v {
            0 => Ok(Self::Fixed),
            1 => Ok(Self::Arithmetic),
            2 => Ok(Self::Huffman),
            3 => Ok(Self::Golomb),
            _ => Err(CodecError::InvalidSubCodecTag),
        }
    }
}

fn encode_golomb_list(w: &mut BitWriter, values: &[u32]) {
    let m = golomb_optimal_m(values).max(1);
    lomont1_encode(w, values.len() as u32, 6, 0);
    lomont1_encode(w, m, 6, 0);
    for &v in values {
        golomb_encode(w, v, m);
    }
}

fn encode_candidate(tag: SubCodecTag, values: &[u32]) -> BitWriter {
    let mut w = BitWriter::new();
    match tag {
        SubCodecTag::Fixed => fixed::encode(&mut w, values),
        SubCodecTag::Golomb => encode_golomb_list(&mut w, values),
        // Huffman's byteLength is open-ended inside LZCL: the outer loop
        // already knows how many symbols to pull from each sub-stream.
        SubCodecTag::Huffman => huffman::encode_block(&mut w, values, END_TOKEN),
        SubCodecTag::Arithmetic => arithmetic::encode_block(&mut w, values, values.len() as u32),
    }
    w
}

/// Picks whichever of the four sub-codecs yields the shortest payload.
fn best_candidate(values: &[u32]) -> (SubCodecTag, BitWriter) {
    [
        SubCodecTag::Fixed,
        SubCodecTag::Arithmetic,
        SubCodecTag::Huffman,
        SubCodecTag::Golomb,
    ]
    .into_iter()
    .map(|tag| (tag, encode_candidate(tag, values)))
    .min_by_key(|(_, w)| w.len())
    .expect("candidate list is non-empty")
}

/// Total bits a sub-codec frame (tag + length prefix + payload) would
/// occupy, used to compare alternative stream layouts before committing.
fn frame_bits(payload: &BitWriter) -> usize {
    let mut scratch = BitWriter::new();
    lomont1_encode(&mut scratch, payload.len() as u32, 6, 0);
    2 + scratch.len() + payload.len()
}

fn emit_frame(w: &mut BitWriter, tag: SubCodecTag, payload: &BitWriter) {
    w.write(tag as u32, 2);
    lomont1_encode(w, payload.len() as u32, 6, 0);
    w.append(payload);
}

/// Run-length-encodes alternating runs of `false`/`true` in `decisions`.
fn decision_runs(decisions: &[bool]) -> (Vec<u32>, bool) {
    let mut runs = Vec::new();
    if decisions.is_empty() {
        return (runs, false);
    }
    let initial = decisions[0];
    let mut current = initial;
    let mut run_len = 0u32;
    for &d in decisions {
        if d == current {
            run_len += 1;
        } else {
            runs.push(run_len);
            current = d;
            run_len = 1;
        }
    }
    runs.push(run_len);
    (runs, initial)
}

/// One-shot encode of a byte buffer.
#[must_use]
pub fn compress(input: &[u8]) -> Vec<u8> {
    let (decisions, literals, distances, lengths) =
        lz77::run_matcher(input, lz77::MAX_DISTANCE, lz77::MAX_LENGTH, lz77::MIN_LENGTH);

    let actual_min_length = lengths.iter().copied().min().unwrap_or(0);
    let actual_max_distance = distances.iter().copied().max().unwrap_or(0);

    let decisions_u32: Vec<u32> = decisions.iter().map(|&b| u32::from(b)).collect();
    let (runs, initial_value) = decision_runs(&decisions);

    let (tag_d, payload_d) = best_candidate(&decisions_u32);
    let (tag_r, payload_r) = best_candidate(&runs);
    let use_decision_runs = frame_bits(&payload_r) + 1 < frame_bits(&payload_d);

    let (tag_lit, payload_lit) = best_candidate(&literals);

    let tokens: Vec<u32> = distances
        .iter()
        .zip(lengths.iter())
        .map(|(&d, &l)| pack_token(l, d, actual_min_length, actual_max_distance))
        .collect();
    let (tag_tok, payload_tok) = best_candidate(&tokens);
    let (tag_dist, payload_dist) = best_candidate(&distances);
    let (tag_len, payload_len) = best_candidate(&lengths);
    let use_separate = frame_bits(&payload_dist) + frame_bits(&payload_len) < frame_bits(&payload_tok);

    let mut w = BitWriter::new();
    lomont1_encode(&mut w, input.len() as u32, 6, 0);
    lomont1_encode(&mut w, actual_max_distance, 10, 0);
    lomont1_encode(&mut w, actual_min_length, 2, 0);

    w.write_bit(use_decision_runs);
    if use_decision_runs {
        w.write_bit(initial_value);
        emit_frame(&mut w, tag_r, &payload_r);
    } else {
        emit_frame(&mut w, tag_d, &payload_d);
    }

    emit_frame(&mut w, tag_lit, &payload_lit);

    w.write_bit(use_separate);
    if use_separate {
        emit_frame(&mut w, tag_dist, &payload_dist);
        emit_frame(&mut w, tag_len, &payload_len);
    } else {
        emit_frame(&mut w, tag_tok, &payload_tok);
    }

    w.to_bytes()
}

enum SubStream<'a> {
    Fixed { reader: BitReader<'a>, bits_per_symbol: u32 },
    Golomb { reader: BitReader<'a>, m: u32 },
    Huffman(HuffmanDecoder<'a>),
    Arithmetic(ArithmeticDecoder<'a>),
}

impl<'a> SubStream<'a> {
    fn next_value(&mut self) -> Result<u32> {
        match self {
            Self::Fixed { reader, bits_per_symbol } => reader.read(*bits_per_symbol),
            Self::Golomb { reader, m } => golomb_decode(reader, *m),
            Self::Huffman(d) => d.symbol(),
            Self::Arithmetic(d) => d.symbol(),
        }
    }
}

fn parse_sub_stream(data: &[u8], frame_start_bit: usize) -> Result<(SubStream<'_>, usize)> {
    let mut r = BitReader::new(data);
    r.set_position(frame_start_bit);
    let tag = SubCodecTag::from_u32(r.read(2)?)?;
    let payload_bits = lomont1_decode(&mut r, 6, 0)? as usize;
    let payload_start = r.position();
    let frame_end = payload_start + payload_bits;

    let sub = match tag {
        SubCodecTag::Fixed => {
            let mut pr = BitReader::new(data);
            pr.set_position(payload_start);
            let _len = lomont1_decode(&mut pr, 6, 0)?;
            let bits_per_symbol = lomont1_decode(&mut pr, 6, 0)?;
            SubStream::Fixed { reader: pr, bits_per_symbol }
        }
        SubCodecTag::Golomb => {
            let mut pr = BitReader::new(data);
            pr.set_position(payload_start);
            let _len = lomont1_decode(&mut pr, 6, 0)?;
            let m = lomont1_decode(&mut pr, 6, 0)?;
            SubStream::Golomb { reader: pr, m }
        }
        SubCodecTag::Huffman => SubStream::Huffman(HuffmanDecoder::start_at(data, payload_start)?),
        SubCodecTag::Arithmetic => SubStream::Arithmetic(ArithmeticDecoder::start_at(data, payload_start)?),
    };
    Ok((sub, frame_end))
}

struct Header {
    byte_length: u32,
    actual_max_distance: u32,
    actual_min_length: u32,
}

fn parse_fixed_header(data: &[u8]) -> Result<Header> {
    let mut r = BitReader::new(data);
    let byte_length = lomont1_decode(&mut r, 6, 0)?;
    let actual_max_distance = lomont1_decode(&mut r, 10, 0)?;
    let actual_min_length = lomont1_decode(&mut r, 2, 0)?;
    Ok(Header {
        byte_length,
        actual_max_distance,
        actual_min_length,
    })
}

/// The cyclic buffer size a decoder needs. Match length is bounded by the
/// matcher's own [`MAX_LENGTH`] constant rather than a header field, since
/// LZCL (unlike LZ77) never stores the observed maximum length.
pub fn required_dest_len(data: &[u8]) -> Result<u32> {
    let h = parse_fixed_header(data)?;
    Ok(h.actual_max_distance.max(MAX_LENGTH) + 1)
}

/// Incremental block decoder with an internally owned cyclic output buffer.
pub struct LzclDecoder<'a> {
    decision_sub: SubStream<'a>,
    use_decision_runs: bool,
    decision_current_value: bool,
    decision_remaining: u32,
    decision_first: bool,
    literal_sub: SubStream<'a>,
    token_sub: Option<SubStream<'a>>,
    distance_sub: Option<SubStream<'a>>,
    length_sub: Option<SubStream<'a>>,
    actual_min_length: u32,
    actual_max_distance: u32,
    byte_length: u32,
    bytes_emitted: u32,
    write_index: u32,
    dest: Vec<u8>,
}

impl<'a> LzclDecoder<'a> {
    /// `dest_len` must be at least [`required_dest_len`]'s return value.
    pub fn start(data: &'a [u8], dest_len: usize) -> Result<Self> {
        let h = parse_fixed_header(data)?;
        let required = (h.actual_max_distance.max(MAX_LENGTH) + 1) as usize;
        if dest_len < required {
            return Err(CodecError::CapacityExceeded);
        }

        let mut r = BitReader::new(data);
        let _byte_length = lomont1_decode(&mut r, 6, 0)?;
        let _actual_max_distance = lomont1_decode(&mut r, 10, 0)?;
        let _actual_min_length = lomont1_decode(&mut r, 2, 0)?;
        let use_decision_runs = r.read(1)? == 1;
        let mut initial_value = false;
        if use_decision_runs {
            initial_value = r.read(1)? == 1;
        }

        let mut pos = r.position();
        let (decision_sub, next_pos) = parse_sub_stream(data, pos)?;
        pos = next_pos;
        let (literal_sub, next_pos) = parse_sub_stream(data, pos)?;
        pos = next_pos;

        let mut flag_reader = BitReader::new(data);
        flag_reader.set_position(pos);
        let use_separate = flag_reader.read(1)? == 1;
        pos = flag_reader.position();

        let (token_sub, distance_sub, length_sub) = if use_separate {
            let (d, p1) = parse_sub_stream(data, pos)?;
            let (l, _p2) = parse_sub_stream(data, p1)?;
            (None, Some(d), Some(l))
        } else {
            let (t, _p1) = parse_sub_stream(data, pos)?;
            (Some(t), None, None)
        };

        Ok(Self {
            decision_sub,
            use_decision_runs,
            decision_current_value: initial_value,
            decision_remaining: 0,
            decision_first: true,
            literal_sub,
            token_sub,
            distance_sub,
            length_sub,
            actual_min_length: h.actual_min_length,
            actual_max_distance: h.actual_max_distance,
            byte_length: h.byte_length,
            bytes_emitted: 0,
            write_index: 0,
            dest: alloc::vec![0u8; dest_len],
        })
    }

    #[must_use]
    pub const fn declared_len(&self) -> u32 {
        self.byte_length
    }

    #[must_use]
    pub fn byte_at(&self, index: u32) -> u8 {
        self.dest[(index % self.dest.len() as u32) as usize]
    }

    fn next_decision(&mut self) -> Result<bool> {
        if !self.use_decision_runs {
            return Ok(self.decision_sub.next_value()? != 0);
        }
        if self.decision_remaining == 0 {
            self.decision_remaining = self.decision_sub.next_value()?;
            if !self.decision_first {
                self.decision_current_value = !self.decision_current_value;
            }
            self.decision_first = false;
        }
        self.decision_remaining -= 1;
        Ok(self.decision_current_value)
    }

    /// Decodes the next decision, producing either one literal or a
    /// back-reference run, and returns bytes written (or `END_TOKEN`).
    pub fn block(&mut self) -> Result<u32> {
        if self.bytes_emitted >= self.byte_length {
            return Ok(END_TOKEN);
        }
        let dlen = self.dest.len() as u32;
        let decision = self.next_decision()?;
        if !decision {
            let literal = self.literal_sub.next_value()?;
            self.dest[(self.write_index % dlen) as usize] = literal as u8;
            self.write_index += 1;
            self.bytes_emitted += 1;
            return Ok(1);
        }

        let (length, distance) = if let Some(tok) = &mut self.token_sub {
            let token = tok.next_value()?;
            unpack_token(token, self.actual_min_length, self.actual_max_distance)
        } else {
            let distance = self.distance_sub.as_mut().unwrap().next_value()?;
            let length = self.length_sub.as_mut().unwrap().next_value()?;
            (length, distance)
        };
        if distance >= dlen {
            return Err(CodecError::InvalidOffset);
        }
        let remaining = self.byte_length - self.bytes_emitted;
        if length > remaining {
            return Err(CodecError::InvalidHeader);
        }
        for _ in 0..length {
            let src = (self.write_index + dlen - distance - 1) % dlen;
            let b = self.dest[src as usize];
            self.dest[(self.write_index % dlen) as usize] = b;
            self.write_index += 1;
        }
        self.bytes_emitted += length;
        Ok(length)
    }
}

/// One-shot decode; sizes the cyclic buffer internally from the header.
pub fn decompress(input: &[u8], out_capacity: usize) -> Result<Vec<u8>> {
    let required = required_dest_len(input)? as usize;
    let mut dec = LzclDecoder::start(input, required)?;
    let declared = dec.declared_len() as usize;
    if declared > out_capacity {
        return Err(CodecError::CapacityExceeded);
    }
    let mut out = Vec::with_capacity(declared);
    let mut produced = 0u32;
    loop {
        let written = dec.block()?;
        if written == END_TOKEN {
            break;
        }
        for k in 0..written {
            out.push(dec.byte_at(produced + k));
        }
        produced += written;
    }
    Ok(out)
}
