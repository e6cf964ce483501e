/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use ember_inflate::{DeflateDecoder, DeflateOptions};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use serde::Deserialize;

use crate::{generate, hash, read_entries, report, Pattern};

#[derive(Clone, Debug, Deserialize)]
pub struct InflateEntry {
    pub name:    String,
    pub pattern: Pattern,
    pub length:  usize,
    pub level:   u32,
    pub seed:    u64
}

fn zlib(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_inflate() {
    let entries: Vec<InflateEntry> = read_entries("inflate.json");
    let mut failures = Vec::new();

    for entry in &entries {
        let data = generate(entry.pattern, entry.length, entry.seed);
        let expected_hash = hash(&data);

        let compressed = zlib(&data, entry.level);
        let options = DeflateOptions::default().set_size_hint(entry.length);

        match DeflateDecoder::new_with_options(&compressed, options).decode_zlib() {
            Ok(bytes) if hash(&bytes) == expected_hash => {}
            Ok(bytes) => failures.push(format!(
                "zlib {}: expected {} but found {} ({} bytes)",
                entry.name,
                expected_hash,
                hash(&bytes),
                bytes.len()
            )),
            Err(e) => failures.push(format!("zlib {}: {:?}", entry.name, e))
        }

        let compressed = deflate(&data, entry.level);

        match DeflateDecoder::new(&compressed).decode_deflate() {
            Ok(bytes) if hash(&bytes) == expected_hash => {}
            Ok(_) => failures.push(format!("deflate {}: hash mismatch", entry.name)),
            Err(e) => failures.push(format!("deflate {}: {:?}", entry.name, e))
        }
    }
    report(&failures);
}

#[test]
fn limit_is_honoured() {
    let entries: Vec<InflateEntry> = read_entries("inflate.json");

    for entry in entries.iter().filter(|e| e.length > 1) {
        let data = generate(entry.pattern, entry.length, entry.seed);
        let compressed = zlib(&data, entry.level);

        let options = DeflateOptions::default().set_limit(entry.length - 1);
        let result = DeflateDecoder::new_with_options(&compressed, options).decode_zlib();

        assert!(result.is_err(), "{} decoded past its limit", entry.name);
    }
}
