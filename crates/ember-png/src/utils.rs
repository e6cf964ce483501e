/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::result::DecodedImage;

use crate::decoder::PLTEEntry;
use crate::enums::PngColor;
use crate::error::PngDecodeErrors;
use crate::PngDecoder;

/// Read sample `index` of a scanline of `depth` bit samples
///
/// Samples below 8 bits are packed most significant bit first,
/// 16 bit samples are big endian.
#[inline(always)]
fn read_sample(row: &[u8], index: usize, depth: u8) -> u16 {
    match depth {
        16 => u16::from_be_bytes([row[index * 2], row[index * 2 + 1]]),
        8 => u16::from(row[index]),
        _ => {
            let depth = usize::from(depth);
            let bit = index * depth;
            let shift = 8 - depth - (bit % 8);
            let mask = (1 << depth) - 1;

            u16::from((row[bit / 8] >> shift) & mask)
        }
    }
}

/// Scale a `depth` bit sample to 8 bits
#[inline(always)]
const fn scale_sample(sample: u16, depth: u8) -> u8 {
    const DEPTH_SCALE_TABLE: [u8; 9] = [0, 0xff, 0x55, 0, 0x11, 0, 0, 0, 0x01];

    match depth {
        16 => (sample >> 8) as u8,
        1 | 2 | 4 | 8 => (sample as u8).wrapping_mul(DEPTH_SCALE_TABLE[depth as usize]),
        _ => 0
    }
}

impl<'a> PngDecoder<'a> {
    /// Expand de-filtered scanlines to RGBA
    pub(crate) fn expand_to_rgba(&self, raw: &[u8]) -> Result<Vec<u8>, PngDecodeErrors> {
        let info = self.png_info;
        let depth = info.depth;
        let stride = info.stride();
        let channels = usize::from(info.component);

        let mut out = vec![0_u8; info.width * info.height * DecodedImage::COMPONENTS];

        let palette: Option<&[PLTEEntry]> =
            if info.color == PngColor::Palette && !self.palette.is_empty() {
                Some(self.palette.as_slice())
            } else {
                None
            };

        for (row, out_row) in raw
            .chunks_exact(stride)
            .zip(out.chunks_exact_mut(info.width * DecodedImage::COMPONENTS))
        {
            for (x, px) in out_row.chunks_exact_mut(DecodedImage::COMPONENTS).enumerate() {
                let sample = |c: usize| read_sample(row, x * channels + c, depth);

                match info.color {
                    PngColor::Luma => {
                        let value = sample(0);
                        let luma = scale_sample(value, depth);

                        px[0] = luma;
                        px[1] = luma;
                        px[2] = luma;
                        px[3] = match self.trns_key {
                            Some(key) if key[0] == value => 0,
                            _ => 255
                        };
                    }
                    PngColor::LumaA => {
                        let luma = scale_sample(sample(0), depth);

                        px[0] = luma;
                        px[1] = luma;
                        px[2] = luma;
                        px[3] = scale_sample(sample(1), depth);
                    }
                    PngColor::RGB => {
                        let rgb = [sample(0), sample(1), sample(2)];

                        px[0] = scale_sample(rgb[0], depth);
                        px[1] = scale_sample(rgb[1], depth);
                        px[2] = scale_sample(rgb[2], depth);
                        px[3] = match self.trns_key {
                            Some(key) if key == rgb => 0,
                            _ => 255
                        };
                    }
                    PngColor::RGBA => {
                        px[0] = scale_sample(sample(0), depth);
                        px[1] = scale_sample(sample(1), depth);
                        px[2] = scale_sample(sample(2), depth);
                        px[3] = scale_sample(sample(3), depth);
                    }
                    PngColor::Palette => {
                        let index = sample(0);

                        match palette {
                            Some(entries) => {
                                let entry = entries.get(usize::from(index)).ok_or_else(|| {
                                    PngDecodeErrors::Generic(format!(
                                        "Palette index {index} out of range for a palette of {} entries",
                                        entries.len()
                                    ))
                                })?;

                                px[0] = entry.red;
                                px[1] = entry.green;
                                px[2] = entry.blue;
                                px[3] = entry.alpha;
                            }
                            None => {
                                // no PLTE, the indices are shown as gray levels
                                let luma = scale_sample(index, depth);

                                px[0] = luma;
                                px[1] = luma;
                                px[2] = luma;
                                px[3] = 255;
                            }
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}
