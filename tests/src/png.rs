/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_png::PngDecoder;
use serde::Deserialize;

use crate::{generate, hash, read_entries, report, Pattern};

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonColor {
    Luma,
    LumaA,
    Rgb,
    Rgba,
    Indexed
}

impl JsonColor {
    fn to_color_type(self) -> png::ColorType {
        match self {
            Self::Luma => png::ColorType::Grayscale,
            Self::LumaA => png::ColorType::GrayscaleAlpha,
            Self::Rgb => png::ColorType::Rgb,
            Self::Rgba => png::ColorType::Rgba,
            Self::Indexed => png::ColorType::Indexed
        }
    }

    const fn channels(self) -> usize {
        match self {
            Self::Luma | Self::Indexed => 1,
            Self::LumaA => 2,
            Self::Rgb => 3,
            Self::Rgba => 4
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PngEntry {
    pub name:    String,
    pub width:   u32,
    pub height:  u32,
    pub color:   JsonColor,
    pub depth:   u8,
    pub pattern: Pattern,
    pub seed:    u64,
    pub comment: Option<String>
}

fn encode(entry: &PngEntry) -> Vec<u8> {
    let stride = (entry.width as usize * entry.color.channels() * usize::from(entry.depth) + 7) / 8;
    let data = generate(entry.pattern, stride * entry.height as usize, entry.seed);

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, entry.width, entry.height);
        encoder.set_color(entry.color.to_color_type());
        encoder.set_depth(png::BitDepth::from_u8(entry.depth).unwrap());

        if let JsonColor::Indexed = entry.color {
            let entries = 1_usize << entry.depth;
            let palette: Vec<u8> = (0..entries * 3).map(|i| (i * 37 % 256) as u8).collect();
            encoder.set_palette(palette);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    out
}

/// Decode with the png crate, normalized to 8 bit RGBA
fn decode_reference(data: &[u8]) -> Vec<u8> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    match info.color_type {
        png::ColorType::Grayscale => buf.iter().flat_map(|l| [*l, *l, *l, 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Rgba => buf,
        png::ColorType::Indexed => unreachable!("palette is expanded")
    }
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_png() {
    let entries: Vec<PngEntry> = read_entries("png.json");
    let mut failures = Vec::new();

    for entry in &entries {
        let file_contents = encode(entry);
        let expected_hash = hash(&decode_reference(&file_contents));

        let mut decoder = PngDecoder::new(&file_contents);

        match decoder.decode() {
            Ok(image) => {
                let hash = hash(&image.data);

                if hash != expected_hash {
                    failures.push(format!(
                        "Hash mismatch for {}\nExpected {} but found {}\nConfig:{:#?}",
                        entry.name, expected_hash, hash, entry
                    ));
                }
            }
            Err(e) => failures.push(format!("{}: {:?}", entry.name, e))
        }
    }
    report(&failures);
}

#[test]
fn headers_match_reference() {
    let entries: Vec<PngEntry> = read_entries("png.json");

    for entry in &entries {
        let file_contents = encode(entry);

        let mut decoder = PngDecoder::new(&file_contents);
        decoder.decode_headers().unwrap();

        assert_eq!(
            decoder.get_dimensions(),
            Some((entry.width as usize, entry.height as usize)),
            "{}",
            entry.name
        );
        let info = decoder.get_info().unwrap();
        assert_eq!(info.depth, entry.depth, "{}", entry.name);
    }
}
