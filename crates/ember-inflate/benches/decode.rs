/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{Read, Write};
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use nanorand::{Rng, WyRand};

fn decode_writer_flate(bytes: &[u8]) -> Vec<u8> {
    let mut writer = Vec::new();

    let mut deflater = flate2::read::ZlibDecoder::new(bytes);

    deflater.read_to_end(&mut writer).unwrap();

    writer
}

fn decode_writer_ember(bytes: &[u8]) -> Vec<u8> {
    let mut deflater = ember_inflate::DeflateDecoder::new(bytes);

    deflater.decode_zlib().unwrap()
}

/// Text-like data, a small alphabet with lots of repeated words
fn make_data() -> Vec<u8> {
    let words: [&[u8]; 8] = [
        b"deflate ", b"huffman ", b"window ", b"literal ", b"length ", b"distance ", b"block ",
        b"\n"
    ];
    let mut rng = WyRand::new_seed(0x5EED);
    let mut data = Vec::with_capacity(4 << 20);

    while data.len() < 4 << 20 {
        data.extend_from_slice(words[rng.generate_range(0_usize..words.len())]);
    }
    data
}

fn decode_test(c: &mut Criterion) {
    let raw = make_data();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    let data = encoder.finish().unwrap();

    let mut group = c.benchmark_group("ZLIB decoding");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("FLATE", |b| {
        b.iter(|| black_box(decode_writer_flate(data.as_slice())))
    });

    group.bench_function("EMBER", |b| {
        b.iter(|| black_box(decode_writer_ember(data.as_slice())))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=decode_test);

criterion_main!(benches);
