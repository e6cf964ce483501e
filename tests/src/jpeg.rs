/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::options::DecoderOptions;
use ember_jpeg::JpegDecoder;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use serde::Deserialize;

use crate::{generate, hash, read_entries, report, Pattern};

#[derive(Copy, Clone, Debug, Deserialize)]
pub enum JsonSampling {
    #[serde(rename = "4:4:4")]
    NoSampling,
    #[serde(rename = "4:2:2")]
    Horizontal,
    #[serde(rename = "4:2:0")]
    Both
}

#[derive(Clone, Debug, Deserialize)]
pub struct JpegEntry {
    pub name:             String,
    pub width:            u16,
    pub height:           u16,
    pub grayscale:        bool,
    pub sampling:         Option<JsonSampling>,
    pub quality:          u8,
    pub restart_interval: u16,
    pub seed:             u64
}

fn encode(entry: &JpegEntry) -> Vec<u8> {
    let (color, channels) = if entry.grayscale {
        (ColorType::Luma, 1)
    } else {
        (ColorType::Rgb, 3)
    };
    let length = usize::from(entry.width) * usize::from(entry.height) * channels;
    // noise smoothed by a ramp so the reference decoders stay close
    let noise = generate(Pattern::Noise, length, entry.seed);
    let pixels: Vec<u8> = noise
        .iter()
        .enumerate()
        .map(|(i, n)| ((i / channels) % 200) as u8 + n / 16)
        .collect();

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, entry.quality);

    match entry.sampling {
        Some(JsonSampling::NoSampling) => encoder.set_sampling_factor(SamplingFactor::R_4_4_4),
        Some(JsonSampling::Horizontal) => encoder.set_sampling_factor(SamplingFactor::R_4_2_2),
        Some(JsonSampling::Both) => encoder.set_sampling_factor(SamplingFactor::R_4_2_0),
        None => ()
    }
    if entry.restart_interval != 0 {
        encoder.set_restart_interval(entry.restart_interval);
    }
    encoder
        .encode(&pixels, entry.width, entry.height, color)
        .unwrap();
    out
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_jpeg() {
    let entries: Vec<JpegEntry> = read_entries("jpeg.json");
    let mut failures = Vec::new();

    for entry in &entries {
        let file_contents = encode(entry);

        let mut reference = jpeg_decoder::Decoder::new(file_contents.as_slice());
        let reference_pixels = reference.decode().unwrap();

        let mut decoder = JpegDecoder::new(&file_contents);

        let image = match decoder.decode() {
            Ok(image) => image,
            Err(e) => {
                failures.push(format!("{}: {:?}", entry.name, e));
                continue;
            }
        };
        let channels = if entry.grayscale { 1 } else { 3 };

        // drop alpha to line up with the reference layout
        let pixels: Vec<u8> = image
            .data
            .chunks_exact(4)
            .flat_map(|p| p[..channels].to_vec())
            .collect();

        if pixels.len() != reference_pixels.len() {
            failures.push(format!(
                "{}: {} samples, reference has {}",
                entry.name,
                pixels.len(),
                reference_pixels.len()
            ));
            continue;
        }
        let total: u64 = pixels
            .iter()
            .zip(&reference_pixels)
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum();
        let mean = total as f64 / pixels.len() as f64;

        if mean >= 2.0 {
            failures.push(format!(
                "{}: mean difference {} against jpeg-decoder",
                entry.name, mean
            ));
        }
    }
    report(&failures);
}

#[test]
fn strict_and_lenient_agree() {
    let entries: Vec<JpegEntry> = read_entries("jpeg.json");

    for entry in &entries {
        let file_contents = encode(entry);

        let lenient = JpegDecoder::new(&file_contents).decode().unwrap();

        let options = DecoderOptions::default().set_strict_mode(true);
        let strict = JpegDecoder::new_with_options(&file_contents, options)
            .decode()
            .unwrap();

        assert_eq!(hash(&lenient.data), hash(&strict.data), "{}", entry.name);
    }
}

#[test]
fn truncated_files_decode_leniently() {
    let entries: Vec<JpegEntry> = read_entries("jpeg.json");

    for entry in entries
        .iter()
        .filter(|e| e.restart_interval == 0 && usize::from(e.width) * usize::from(e.height) >= 1024)
    {
        let file_contents = encode(entry);
        // cut in the middle of the entropy coded data
        let sos = file_contents
            .windows(2)
            .rposition(|w| w == [0xFF, 0xDA])
            .unwrap();
        let truncated = &file_contents[..sos + (file_contents.len() - sos) / 2];

        let image = JpegDecoder::new(truncated).decode().unwrap();
        assert_eq!(
            (image.width, image.height),
            (usize::from(entry.width), usize::from(entry.height)),
            "{}",
            entry.name
        );

        let options = DecoderOptions::default().set_strict_mode(true);
        assert!(
            JpegDecoder::new_with_options(truncated, options)
                .decode()
                .is_err(),
            "{}",
            entry.name
        );
    }
}
