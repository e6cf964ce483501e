/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Cross crate tests
//!
//! Every case is described in a json manifest under `tests/`, the
//! fixture is synthesized with a reference encoder and the decoded
//! output is compared by hash against the reference decoder.
use std::fs::read;
use std::path::Path;

use nanorand::{Rng, WyRand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

mod inflate;
mod jpeg;
mod png;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Uniformly random bytes, close to incompressible
    Noise,
    /// A short alphabet with long matches
    Text,
    /// Long runs of a single byte
    Runs
}

/// Read the manifest `name` from the `tests` directory
pub fn read_entries<T: DeserializeOwned>(name: &str) -> Vec<T> {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(name);

    let json_file = read(&file).unwrap_or_else(|e| panic!("Could not read {file:?}: {e}"));

    serde_json::from_slice(&json_file).unwrap_or_else(|e| panic!("Bad manifest {file:?}: {e}"))
}

/// Deterministic data of `length` bytes
pub fn generate(pattern: Pattern, length: usize, seed: u64) -> Vec<u8> {
    let mut rng = WyRand::new_seed(seed);

    match pattern {
        Pattern::Noise => (0..length).map(|_| rng.generate::<u8>()).collect(),
        Pattern::Text => {
            const WORDS: [&[u8]; 6] = [b"ember ", b"inflate ", b"huffman ", b"tree ", b"png ", b"\n"];
            let mut out = Vec::with_capacity(length + 16);

            while out.len() < length {
                out.extend_from_slice(WORDS[rng.generate_range(0..WORDS.len())]);
            }
            out.truncate(length);
            out
        }
        Pattern::Runs => {
            let mut out = Vec::with_capacity(length + 300);

            while out.len() < length {
                let byte = rng.generate::<u8>();
                let run = rng.generate_range(1_usize..300);
                out.extend(std::iter::repeat(byte).take(run));
            }
            out.truncate(length);
            out
        }
    }
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}

/// Panic with every failing case at once
fn report(failures: &[String]) {
    if !failures.is_empty() {
        panic!("Errors found during test decoding\n {failures:#?}");
    }
}
