use codecs::{arithmetic, huffman, lz77, lzcl};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Generates a vector of pseudo-random bytes using a deterministic Linear
/// Congruential Generator, so benchmarks are reproducible across runs.
fn generate_random(size: usize) -> Vec<u8> {
    let mut vec = Vec::with_capacity(size);
    let mut seed: u64 = 0xDEAD_BEEF;
    for _ in 0..size {
        seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
        vec.push((seed >> 24) as u8);
    }
    vec
}

/// Generates a vector containing repeated standard text sentences —
/// "typical" compressible data such as text logs or JSON.
fn generate_text(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. ";
    let mut vec = Vec::with_capacity(size);
    while vec.len() < size {
        vec.extend_from_slice(text);
    }
    vec.truncate(size);
    vec
}

/// Generates a vector filled with zeroes — a best case for most codecs here.
fn generate_zeroes(size: usize) -> Vec<u8> {
    vec![0u8; size]
}

macro_rules! bench_codec {
    ($fn_name:ident, $group_name:literal, $size:expr, $compress:path, $decompress:path) => {
        fn $fn_name(c: &mut Criterion) {
            let size = $size;
            let scenarios = [
                ("Zeroes", generate_zeroes(size)),
                ("Random", generate_random(size)),
                ("Text", generate_text(size)),
            ];

            let mut group = c.benchmark_group(concat!($group_name, " Compression"));
            for (name, input_data) in &scenarios {
                group.throughput(Throughput::Bytes(size as u64));
                group.bench_function(format!("{name} {}B", size), |b| {
                    b.iter(|| black_box($compress(black_box(input_data))));
                });
            }
            group.finish();

            let mut group = c.benchmark_group(concat!($group_name, " Decompression"));
            for (name, input_data) in &scenarios {
                let compressed = $compress(input_data);
                group.throughput(Throughput::Bytes(size as u64));
                group.bench_function(format!("{name} {}B", size), |b| {
                    b.iter(|| $decompress(black_box(&compressed), size).unwrap());
                });
            }
            group.finish();
        }
    };
}

bench_codec!(bench_huffman, "Huffman", 16 * 1024, huffman::compress, huffman::decompress);
bench_codec!(bench_arithmetic, "Arithmetic", 16 * 1024, arithmetic::compress, arithmetic::decompress);
// The greedy matcher scans every candidate distance per position, so these
// stay far smaller than the entropy-coder benchmarks above.
bench_codec!(bench_lz77, "LZ77", 4 * 1024, lz77::compress, lz77::decompress);
bench_codec!(bench_lzcl, "LZCL", 4 * 1024, lzcl::compress, lzcl::decompress);

criterion_group!(benches, bench_huffman, bench_arithmetic, bench_lz77, bench_lzcl);
criterion_main!(benches);
