/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sample inputs shared by the benchmarks
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use nanorand::{Rng, WyRand};

/// Text-like bytes built from a small vocabulary
pub fn text_corpus(length: usize) -> Vec<u8> {
    const WORDS: [&[u8]; 8] = [
        b"the ", b"quick ", b"brown ", b"fox ", b"jumps ", b"over ", b"lazy ", b"dog.\n"
    ];
    let mut rng = WyRand::new_seed(0x1234);
    let mut out = Vec::with_capacity(length + 8);

    while out.len() < length {
        out.extend_from_slice(WORDS[rng.generate_range(0..WORDS.len())]);
    }
    out.truncate(length);
    out
}

pub fn zlib_compress(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A gradient with noise, compressible but not trivially so
fn pixels(width: usize, height: usize, channels: usize, seed: u64) -> Vec<u8> {
    let mut rng = WyRand::new_seed(seed);

    (0..width * height * channels)
        .map(|i| ((i / channels % width) * 255 / width) as u8 / 2 + rng.generate_range(0_u8..64))
        .collect()
}

pub fn sample_png(width: u32, height: u32, color: png::ColorType) -> Vec<u8> {
    let channels = match color {
        png::ColorType::Grayscale | png::ColorType::Indexed => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4
    };
    let data = pixels(width as usize, height as usize, channels, 1);

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if color == png::ColorType::Indexed {
            encoder.set_palette((0..768).map(|i| (i % 256) as u8).collect::<Vec<u8>>());
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    out
}

pub fn sample_jpeg(width: u16, height: u16, sampling: Option<SamplingFactor>) -> Vec<u8> {
    let (color, channels) = match sampling {
        Some(_) => (ColorType::Rgb, 3),
        None => (ColorType::Luma, 1)
    };
    let data = pixels(usize::from(width), usize::from(height), channels, 2);

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, 85);
    if let Some(sampling) = sampling {
        encoder.set_sampling_factor(sampling);
    }
    encoder.encode(&data, width, height, color).unwrap();
    out
}
