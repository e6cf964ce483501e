/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Compare our output with streams produced by flate2
use std::io::Write;

use ember_inflate::errors::InflateDecodeErrors;
use ember_inflate::{DeflateDecoder, DeflateOptions};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use nanorand::{Rng, WyRand};

/// Data with enough repetition for matches at all kinds of distances
fn test_data(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = WyRand::new_seed(seed);
    let mut data = Vec::with_capacity(length);

    while data.len() < length {
        let choice = rng.generate_range(0_u8..4);

        if choice == 0 || data.len() < 300 {
            data.push(rng.generate_range(b'a'..=b'z'));
        } else {
            let distance = rng.generate_range(1..data.len().min(32768));
            let run = rng.generate_range(3_usize..300);
            let start = data.len() - distance;

            for i in 0..run {
                let byte = data[start + i];
                data.push(byte);
            }
        }
    }
    data.truncate(length);
    data
}

fn encode_zlib(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn encode_deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_similarity_zlib() {
    for level in 0..=9 {
        let data = test_data(200_000, u64::from(level));
        let compressed = encode_zlib(&data, level);

        let decoded = DeflateDecoder::new(&compressed).decode_zlib().unwrap();

        assert_eq!(decoded.len(), data.len(), "level {level}");
        for (pos, (a, b)) in decoded.iter().zip(data.iter()).enumerate() {
            if a != b {
                panic!("[level {level}, position: {pos}]: {a} {b} do not match");
            }
        }
    }
}

#[test]
fn test_similarity_deflate() {
    for level in [0, 1, 6, 9] {
        let data = test_data(70_000, 99);
        let compressed = encode_deflate(&data, level);

        let decoded = DeflateDecoder::new(&compressed).decode_deflate().unwrap();

        assert!(decoded == data, "level {level}");
    }
}

#[test]
fn test_random_bytes() {
    // incompressible data mostly ends up in stored or literal only blocks
    let mut rng = WyRand::new_seed(7);
    let data: Vec<u8> = (0..100_000).map(|_| rng.generate::<u8>()).collect();

    let compressed = encode_zlib(&data, 6);
    let decoded = DeflateDecoder::new(&compressed).decode_zlib().unwrap();

    assert!(decoded == data);
}

#[test]
fn test_empty_input() {
    let compressed = encode_zlib(&[], 6);
    let decoded = DeflateDecoder::new(&compressed).decode_zlib().unwrap();

    assert!(decoded.is_empty());
}

#[test]
fn test_limit() {
    let data = test_data(50_000, 3);
    let compressed = encode_zlib(&data, 6);

    let options = DeflateOptions::default().set_limit(10_000);
    let err = DeflateDecoder::new_with_options(&compressed, options)
        .decode_zlib()
        .unwrap_err();

    assert!(matches!(err, InflateDecodeErrors::OutputLimitExceeded(10_000, _)));

    // an exact limit is fine
    let options = DeflateOptions::default()
        .set_limit(data.len())
        .set_size_hint(data.len());
    let decoded = DeflateDecoder::new_with_options(&compressed, options)
        .decode_zlib()
        .unwrap();

    assert_eq!(decoded.len(), data.len());
}

#[test]
fn test_truncated_stream() {
    let data = test_data(20_000, 11);
    let compressed = encode_zlib(&data, 6);

    for cut in [3, compressed.len() / 2, compressed.len() - 5] {
        let result = DeflateDecoder::new(&compressed[..cut]).decode_zlib();

        let err = result.unwrap_err();
        assert!(err.kind().is_corrupt(), "cut at {cut}: {err:?}");
    }
}

#[test]
fn test_missing_checksum() {
    let compressed = encode_zlib(b"hello hello hello", 6);
    let without_trailer = &compressed[..compressed.len() - 4];

    assert!(DeflateDecoder::new(without_trailer).decode_zlib().is_err());

    let options = DeflateOptions::default().set_confirm_checksum(false);
    let decoded = DeflateDecoder::new_with_options(without_trailer, options)
        .decode_zlib()
        .unwrap();

    assert_eq!(decoded, b"hello hello hello");
}
