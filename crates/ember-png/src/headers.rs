/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::log::{info, warn};

use crate::constants::{IHDR_LENGTH, MAX_PALETTE_ENTRIES};
use crate::decoder::{PLTEEntry, PngChunk};
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::PngDecoder;

impl<'a> PngDecoder<'a> {
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if self.seen_hdr {
            return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
        }

        if chunk.length != IHDR_LENGTH {
            return Err(PngDecodeErrors::Generic(format!(
                "BAD IHDR length {}, expected {IHDR_LENGTH}",
                chunk.length
            )));
        }
        let mut payload = self.stream.sub_reader(chunk.length)?;

        self.png_info.width = payload.read_u32_be()? as usize;
        self.png_info.height = payload.read_u32_be()? as usize;

        if self.png_info.width == 0 || self.png_info.height == 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "Width or height cannot be zero"
            ));
        }

        if self.png_info.width > self.options.get_max_width() {
            return Err(PngDecodeErrors::Generic(format!(
                "Image width {}, larger than maximum configured width {}, aborting",
                self.png_info.width,
                self.options.get_max_width()
            )));
        }

        if self.png_info.height > self.options.get_max_height() {
            return Err(PngDecodeErrors::Generic(format!(
                "Image height {}, larger than maximum configured height {}, aborting",
                self.png_info.height,
                self.options.get_max_height()
            )));
        }

        self.png_info.depth = payload.read_u8()?;
        let color = payload.read_u8()?;

        if let Some(img_color) = PngColor::from_int(color) {
            self.png_info.color = img_color;
        } else {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown color value {color}"
            )));
        }
        self.png_info.component = self.png_info.color.num_components();

        // verify colors plus bit depths
        if !self.png_info.color.is_valid_depth(self.png_info.depth) {
            return Err(PngDecodeErrors::Generic(format!(
                "Bit depth {} is not allowed for color type {:?}",
                self.png_info.depth, self.png_info.color
            )));
        }

        if payload.read_u8()? != 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "Unknown compression method"
            ));
        }

        let filter_method = payload.read_u8()?;

        if filter_method != 0 {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown filter method {filter_method}"
            )));
        }

        let interlace_method = payload.read_u8()?;

        if let Some(method) = InterlaceMethod::from_int(interlace_method) {
            self.png_info.interlace_method = method;
        } else {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown interlace method {interlace_method}",
            )));
        }

        // skip crc
        self.stream.skip(4)?;

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Color type: {:?}", self.png_info.color);
        info!("Depth: {:?}", self.png_info.depth);
        info!("Interlace :{:?}", self.png_info.interlace_method);

        self.seen_hdr = true;

        Ok(())
    }

    pub(crate) fn parse_plte(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if chunk.length % 3 != 0 || chunk.length == 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "Invalid PLTE length, corrupt PNG"
            ));
        }
        if chunk.length / 3 > MAX_PALETTE_ENTRIES {
            return Err(PngDecodeErrors::Generic(format!(
                "PLTE chunk with {} entries, more than {MAX_PALETTE_ENTRIES}",
                chunk.length / 3
            )));
        }
        if !self.palette.is_empty() {
            return Err(PngDecodeErrors::GenericStatic("Multiple PLTE chunks"));
        }
        let payload = self.stream.get_as_ref(chunk.length)?;

        // skip crc chunk
        self.stream.skip(4)?;

        if matches!(self.png_info.color, PngColor::Luma | PngColor::LumaA) {
            if self.options.get_strict_mode() {
                return Err(PngDecodeErrors::GenericStatic(
                    "PLTE chunk in a grayscale image"
                ));
            }
            warn!("Ignoring PLTE chunk in a grayscale image");
            return Ok(());
        }

        self.palette = payload
            .chunks_exact(3)
            .map(|entry| PLTEEntry {
                red:   entry[0],
                green: entry[1],
                blue:  entry[2],
                alpha: 255
            })
            .collect();

        Ok(())
    }

    pub(crate) fn parse_idat(&mut self, png_chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        // get a reference to the IDAT chunk stream and push it,
        // we will later pass these to the deflate decoder as a whole, to get the whole
        // uncompressed stream.

        let idat_stream = self.stream.get_as_ref(png_chunk.length)?;

        self.idat_chunks.extend_from_slice(idat_stream);
        self.seen_idat = true;

        // skip crc
        self.stream.skip(4)?;

        Ok(())
    }

    pub(crate) fn parse_trns(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        let mut payload = self.stream.sub_reader(chunk.length)?;

        // skip crc
        self.stream.skip(4)?;

        match self.png_info.color {
            PngColor::Luma => {
                if chunk.length != 2 {
                    return Err(PngDecodeErrors::GenericStatic("Bad tRNS length for grayscale"));
                }
                let grey_sample = payload.read_u16_be()?;

                self.trns_key = Some([grey_sample, 0, 0]);
            }
            PngColor::RGB => {
                if chunk.length != 6 {
                    return Err(PngDecodeErrors::GenericStatic("Bad tRNS length for RGB"));
                }
                let red_sample = payload.read_u16_be()?;
                let green_sample = payload.read_u16_be()?;
                let blue_sample = payload.read_u16_be()?;

                self.trns_key = Some([red_sample, green_sample, blue_sample]);
            }
            PngColor::Palette => {
                if self.palette.is_empty() {
                    return Err(PngDecodeErrors::GenericStatic("tRNS chunk before PLTE"));
                }
                if chunk.length > self.palette.len() {
                    return Err(PngDecodeErrors::GenericStatic(
                        "tRNS chunk with too long entries"
                    ));
                }
                for entry in self.palette.iter_mut().take(chunk.length) {
                    entry.alpha = payload.read_u8()?;
                }
            }
            PngColor::LumaA | PngColor::RGBA => {
                let msg = format!(
                    "A tRNS chunk shall not appear for colour type {:?} as it is already transparent",
                    self.png_info.color
                );
                if self.options.get_strict_mode() {
                    return Err(PngDecodeErrors::Generic(msg));
                }
                warn!("{}", msg);
            }
        }

        Ok(())
    }
}
