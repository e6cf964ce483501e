/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding results for images

/// A decoded image
///
/// Pixels are always stored as interleaved 8 bit RGBA,
/// row after row with no padding between rows.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedImage {
    pub width:  usize,
    pub height: usize,
    pub data:   Vec<u8>
}

impl DecodedImage {
    /// Number of bytes per pixel in [`DecodedImage::data`]
    pub const COMPONENTS: usize = 4;

    pub fn new(width: usize, height: usize, data: Vec<u8>) -> DecodedImage {
        debug_assert_eq!(data.len(), width * height * Self::COMPONENTS);

        DecodedImage {
            width,
            height,
            data
        }
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Return the RGBA value of the pixel at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * Self::COMPONENTS;
        let px = self.data.get(start..start + Self::COMPONENTS)?;

        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.data
    }
}
