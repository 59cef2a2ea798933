//! Universal integer codes used to give every codec header a stable,
//! self-descriptive binary format.
//!
//! [`lomont1_encode`]/[`lomont1_decode`] is the only code required to read a
//! codec header; the rest (Elias family, Even-Rodeh, Stout-k, truncated
//! binary, Golomb, BASC) support the arithmetic codec's frequency table and
//! LZCL's internals, or stand on their own as general-purpose codes.

use alloc::vec::Vec;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::Result;

/// Bit-length of `v`'s minimal binary representation; `0` for `v == 0`.
#[must_use]
pub const fn bit_length(v: u32) -> u32 {
    32 - v.leading_zeros()
}

// ---------------------------------------------------------------------
// Lomont-1
// ---------------------------------------------------------------------

/// Encodes `value` as successive chunks, low bits first. Before each chunk a
/// continuation bit (`1` = another chunk follows, `0` = this is the last) is
/// written. `chunk_size` grows by `delta_chunk` after each chunk (never below
/// 1 bit).
pub fn lomont1_encode(w: &mut BitWriter, mut value: u32, chunk_size: u32, delta_chunk: i32) {
    let mut size = chunk_size;
    loop {
        let mask: u32 = if size >= 32 { u32::MAX } else { (1u32 << size) - 1 };
        let chunk = value & mask;
        value = if size >= 32 { 0 } else { value >> size };
        let more = value != 0;
        w.write_bit(more);
        w.write(chunk, size);
        if !more {
            break;
        }
        size = (size as i32 + delta_chunk).max(1) as u32;
    }
}

/// Symmetric decoder for [`lomont1_encode`].
pub fn lomont1_decode(r: &mut BitReader<'_>, chunk_size: u32, delta_chunk: i32) -> Result<u32> {
    let mut size = chunk_size;
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        let more = r.read(1)? != 0;
        let chunk = r.read(size)?;
        if shift < 32 {
            value |= chunk.checked_shl(shift).unwrap_or(0);
        }
        shift = shift.saturating_add(size);
        if !more {
            break;
        }
        size = (size as i32 + delta_chunk).max(1) as u32;
    }
    Ok(value)
}

// ---------------------------------------------------------------------
// Elias Gamma / Delta / Omega
// ---------------------------------------------------------------------

/// Elias gamma code. Domain: `v >= 1`.
pub fn gamma_encode(w: &mut BitWriter, v: u32) {
    debug_assert!(v >= 1);
    let n = bit_length(v);
    for _ in 1..n {
        w.write_bit(false);
    }
    w.write(v, n);
}

pub fn gamma_decode(r: &mut BitReader<'_>) -> Result<u32> {
    let mut zeros = 0u32;
    while r.read(1)? == 0 {
        zeros += 1;
    }
    let mut value: u32 = 1;
    for _ in 0..zeros {
        value = (value << 1) | r.read(1)?;
    }
    Ok(value)
}

/// Elias delta code. Domain: `v >= 1`.
pub fn delta_encode(w: &mut BitWriter, v: u32) {
    debug_assert!(v >= 1);
    let n = bit_length(v);
    gamma_encode(w, n);
    if n > 1 {
        w.write(v, n - 1);
    }
}

pub fn delta_decode(r: &mut BitReader<'_>) -> Result<u32> {
    let n = gamma_decode(r)?;
    if n == 1 {
        return Ok(1);
    }
    let low = r.read(n - 1)?;
    Ok((1u32 << (n - 1)) | low)
}

/// Elias omega code. Domain: `v >= 1`.
pub fn omega_encode(w: &mut BitWriter, v: u32) {
    debug_assert!(v >= 1);
    let mut groups: Vec<u32> = Vec::new();
    let mut n = v;
    while n > 1 {
        groups.push(n);
        n = bit_length(n) - 1;
    }
    for &g in groups.iter().rev() {
        let bl = bit_length(g);
        w.write(g, bl);
    }
    w.write_bit(false);
}

pub fn omega_decode(r: &mut BitReader<'_>) -> Result<u32> {
    let mut n: u32 = 1;
    loop {
        let b = r.read(1)?;
        if b == 0 {
            return Ok(n);
        }
        let extra = r.read(n)?;
        n = (1u32 << n) | extra;
    }
}

// ---------------------------------------------------------------------
// Even-Rodeh
// ---------------------------------------------------------------------

/// A recursive, length-prefixed universal code in the Even-Rodeh family.
/// Unlike the Elias codes above, it natively supports `v == 0`: small values
/// (`< 16`) are written as a fixed 4-bit seed; larger values are reached by
/// repeatedly recording the bit-length of the previous value, each such
/// "growth" step flagged by a leading continuation bit.
pub fn even_rodeh_encode(w: &mut BitWriter, v: u32) {
    let mut chain: Vec<u32> = alloc::vec![v];
    let mut cur = v;
    while cur >= 16 {
        cur = bit_length(cur);
        chain.push(cur);
    }
    let seed = *chain.last().unwrap();
    w.write(seed, 4);
    for i in (0..chain.len() - 1).rev() {
        let val = chain[i];
        let bl = bit_length(val);
        w.write_bit(true);
        w.write(val, bl - 1);
    }
    w.write_bit(false);
}

pub fn even_rodeh_decode(r: &mut BitReader<'_>) -> Result<u32> {
    let mut n = r.read(4)?;
    loop {
        let cont = r.read(1)?;
        if cont == 0 {
            return Ok(n);
        }
        let extra = r.read(n - 1)?;
        n = (1u32 << (n - 1)) | extra;
    }
}

// ---------------------------------------------------------------------
// Stout-k
// ---------------------------------------------------------------------

/// A `k`-bit-granularity start-step-stop style code: a unary prefix records
/// how many `k`-bit groups follow, then `v + 1` is written across that many
/// groups (zero-padded at the top). Domain: `v >= 0`, `k >= 1`.
pub fn stout_encode(w: &mut BitWriter, v: u32, k: u32) {
    debug_assert!(k >= 1);
    let n = v + 1;
    let l = bit_length(n);
    let groups = l.div_ceil(k).max(1);
    for _ in 1..groups {
        w.write_bit(true);
    }
    w.write_bit(false);
    w.write(n, groups * k);
}

pub fn stout_decode(r: &mut BitReader<'_>, k: u32) -> Result<u32> {
    debug_assert!(k >= 1);
    let mut groups = 1u32;
    while r.read(1)? == 1 {
        groups += 1;
    }
    let n = r.read(groups * k)?;
    Ok(n - 1)
}

// ---------------------------------------------------------------------
// Truncated binary
// ---------------------------------------------------------------------

/// Encodes `v` drawn from `[0, n)` in `k - 1` or `k` bits, `k = ceil(log2(n))`,
/// with the short codewords assigned to the low end of the range.
pub fn truncated_encode(w: &mut BitWriter, v: u32, n: u32) {
    debug_assert!(n >= 1 && v < n);
    if n == 1 {
        return;
    }
    let k = ceil_log2(n);
    let u = (1u32 << k) - n;
    if v < u {
        w.write(v, k - 1);
    } else {
        w.write(v + u, k);
    }
}

pub fn truncated_decode(r: &mut BitReader<'_>, n: u32) -> Result<u32> {
    if n == 1 {
        return Ok(0);
    }
    let k = ceil_log2(n);
    let u = (1u32 << k) - n;
    let p = r.read(k - 1)?;
    if p < u {
        Ok(p)
    } else {
        let bit = r.read(1)?;
        let full = (p << 1) | bit;
        Ok(full - u)
    }
}

#[must_use]
const fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        32 - (n - 1).leading_zeros()
    }
}

// ---------------------------------------------------------------------
// Golomb-m
// ---------------------------------------------------------------------

/// Encodes `v >= 0` as a unary quotient (terminated by a `0` bit) followed by
/// a [`truncated_encode`]d remainder modulo `m`.
pub fn golomb_encode(w: &mut BitWriter, v: u32, m: u32) {
    debug_assert!(m >= 1);
    let q = v / m;
    let r = v % m;
    for _ in 0..q {
        w.write_bit(true);
    }
    w.write_bit(false);
    truncated_encode(w, r, m);
}

pub fn golomb_decode(r: &mut BitReader<'_>, m: u32) -> Result<u32> {
    debug_assert!(m >= 1);
    let mut q: u32 = 0;
    while r.read(1)? == 1 {
        q += 1;
    }
    let rem = truncated_decode(r, m)?;
    Ok(q * m + rem)
}

/// Searches for the Golomb parameter minimizing total encoded bit length,
/// exploiting that bit length is unimodal in `m`: start at the smallest
/// power of two at least as large as the maximum value, halve until the
/// length stops improving, binary-search the surrounding range, then probe
/// the immediate neighbors of the winner.
#[must_use]
pub fn golomb_optimal_m(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 1;
    }
    let max_v = values.iter().copied().max().unwrap_or(0);
    let cost = |m: u32| -> u64 {
        let mut total: u64 = 0;
        for &v in values {
            let q = v / m;
            let k = ceil_log2(m);
            total += u64::from(q) + 1 + u64::from(k.saturating_sub(1));
        }
        total
    };

    let mut m = (max_v + 1).next_power_of_two().max(1);
    let mut best_cost = cost(m);
    loop {
        let half = (m / 2).max(1);
        if half == m {
            break;
        }
        let half_cost = cost(half);
        if half_cost < best_cost {
            m = half;
            best_cost = half_cost;
        } else {
            break;
        }
    }

    let mut lo = (m / 2).max(1);
    let mut hi = m * 2;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let mid = mid.max(1);
        if mid == lo {
            break;
        }
        if cost(mid) <= cost(mid + 1) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let mut candidate = lo.max(1);
    let mut candidate_cost = cost(candidate);
    for probe in [candidate.saturating_sub(1).max(1), candidate + 1] {
        let c = cost(probe);
        if c < candidate_cost {
            candidate = probe;
            candidate_cost = c;
        }
    }
    let _ = candidate_cost;
    candidate
}

// ---------------------------------------------------------------------
// BASC — Binary Adaptive Sequential Coding
// ---------------------------------------------------------------------

/// Encodes a list of non-negative integers: length, then each value's
/// bit-length tracked incrementally against the previous value's bit-length
/// so that steady-state lists of similarly-sized integers cost little more
/// than the values themselves.
pub fn basc_encode(w: &mut BitWriter, values: &[u32]) {
    lomont1_encode(w, values.len() as u32 + 1, 6, 0);
    if values.is_empty() {
        return;
    }
    let mut prev_bitlen = bit_length(values[0]);
    lomont1_encode(w, prev_bitlen, 6, 0);
    w.write(values[0], prev_bitlen);

    for &v in &values[1..] {
        let bl = bit_length(v);
        if bl <= prev_bitlen {
            w.write_bit(false);
            w.write(v, prev_bitlen);
        } else {
            let delta = bl - prev_bitlen;
            for _ in 0..delta {
                w.write_bit(true);
            }
            w.write_bit(false);
            w.write(v, bl - 1);
        }
        prev_bitlen = bl;
    }
}

pub fn basc_decode(r: &mut BitReader<'_>) -> Result<Vec<u32>> {
    let len_plus_one = lomont1_decode(r, 6, 0)?;
    if len_plus_one == 0 {
        return Err(crate::error::CodecError::InvalidHeader);
    }
    let len = (len_plus_one - 1) as usize;
    let mut values = Vec::with_capacity(len);
    if len == 0 {
        return Ok(values);
    }

    let mut prev_bitlen = lomont1_decode(r, 6, 0)?;
    let first = r.read(prev_bitlen)?;
    values.push(first);

    for _ in 1..len {
        let mut delta = 0u32;
        while r.read(1)? == 1 {
            delta += 1;
        }
        let v = if delta == 0 {
            r.read(prev_bitlen)?
        } else {
            let bl = prev_bitlen + delta;
            let extra = r.read(bl - 1)?;
            (1u32 << (bl - 1)) | extra
        };
        prev_bitlen = bit_length(v);
        values.push(v);
    }
    Ok(values)
}

/// Replays a BASC-coded list from an absolute bit position without
/// materializing it, invoking `visit` with each decoded value and stopping
/// early if `visit` returns `true`. Used by the arithmetic decoder to find a
/// symbol's cumulative frequency range without copying the table out of the
/// stream.
pub fn basc_replay<F: FnMut(usize, u32) -> bool>(
    r: &BitReader<'_>,
    start_bit: usize,
    mut visit: F,
) -> Result<()> {
    let mut pos = start_bit;
    let len_plus_one = read_lomont1_from(r, &mut pos, 6, 0)?;
    let len = (len_plus_one - 1) as usize;
    if len == 0 {
        return Ok(());
    }

    let mut prev_bitlen = read_lomont1_from(r, &mut pos, 6, 0)?;
    let first = r.read_from(&mut pos, prev_bitlen)?;
    if visit(0, first) {
        return Ok(());
    }

    for i in 1..len {
        let mut delta = 0u32;
        while r.read_from(&mut pos, 1)? == 1 {
            delta += 1;
        }
        let v = if delta == 0 {
            r.read_from(&mut pos, prev_bitlen)?
        } else {
            let bl = prev_bitlen + delta;
            let extra = r.read_from(&mut pos, bl - 1)?;
            (1u32 << (bl - 1)) | extra
        };
        prev_bitlen = bit_length(v);
        if visit(i, v) {
            return Ok(());
        }
    }
    Ok(())
}

/// Decodes a full Lomont-1 value using non-moving absolute reads, so
/// [`basc_replay`] can read header fields without disturbing a reader's main
/// cursor.
fn read_lomont1_from(
    r: &BitReader<'_>,
    pos: &mut usize,
    chunk_size: u32,
    delta_chunk: i32,
) -> Result<u32> {
    let mut size = chunk_size;
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        let more = r.read_from(pos, 1)? != 0;
        let chunk = r.read_from(pos, size)?;
        if shift < 32 {
            value |= chunk.checked_shl(shift).unwrap_or(0);
        }
        shift = shift.saturating_add(size);
        if !more {
            break;
        }
        size = (size as i32 + delta_chunk).max(1) as u32;
    }
    Ok(value)
}
