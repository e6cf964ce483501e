/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{Cursor, Read};
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ember_benches::{text_corpus, zlib_compress};

fn decode_writer_flate(bytes: &[u8]) -> Vec<u8> {
    let mut writer = Vec::new();

    let mut deflater = flate2::read::ZlibDecoder::new(Cursor::new(bytes));

    deflater.read_to_end(&mut writer).unwrap();

    writer
}

fn decode_writer_ember(bytes: &[u8], size: usize) -> Vec<u8> {
    let options = ember_inflate::DeflateOptions::default().set_size_hint(size);

    let mut deflater = ember_inflate::DeflateDecoder::new_with_options(bytes, options);

    deflater.decode_zlib().unwrap()
}

fn bench_level(c: &mut Criterion, name: &str, level: u32) {
    let size = 16 << 20;
    let data = zlib_compress(&text_corpus(size), level);

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("flate2", |b| {
        b.iter(|| black_box(decode_writer_flate(data.as_slice())))
    });

    group.bench_function("ember-inflate", |b| {
        b.iter(|| black_box(decode_writer_ember(data.as_slice(), size)))
    });
}

fn decode_test_fast(c: &mut Criterion) {
    bench_level(c, "inflate: text, fast compression", 1);
}

fn decode_test_best(c: &mut Criterion) {
    bench_level(c, "inflate: text, best compression", 9);
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=decode_test_fast,decode_test_best);

criterion_main!(benches);
