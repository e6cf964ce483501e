/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module exports a single struct to store information about
//! JPEG image components
//!
//! The data is extracted from a SOF header.

use crate::decoder::MAX_COMPONENTS;
use crate::errors::DecodeErrors;

/// Maximum sampling factor a component may declare
pub(crate) const MAX_SAMPLING_FACTOR: usize = 4;

/// A single image component, its sampling, tables and coefficients
#[derive(Clone)]
pub(crate) struct Components {
    /// The identifier the `SOS` uses to refer to this component
    pub id:                        u8,
    /// Position of the component in the frame header
    pub position:                  usize,
    /// Horizontal sampling factor
    pub horizontal_sample:         usize,
    /// Vertical sampling factor
    pub vertical_sample:           usize,
    /// Quantization table this component uses
    pub quantization_table_number: u8,
    /// Copy of the quantization table in natural order, taken when a scan
    /// containing this component starts
    pub quantization_table:        [u16; 64],
    /// DC and AC Huffman table ids from the current scan
    pub dc_huff_table:             usize,
    pub ac_huff_table:             usize,
    /// DC prediction of the current scan
    pub dc_pred:                   i32,
    /// Samples per line and lines of this component, unpadded
    pub width:                     usize,
    pub height:                    usize,
    /// Size of the padded block grid
    pub blocks_per_line:           usize,
    pub block_rows:                usize,
    /// Quantized coefficients, 64 per block in natural order, blocks in
    /// raster order over the padded grid
    pub coefficients:              Vec<i16>
}

impl Components {
    /// Create a new instance from three bytes from the start of frame
    pub fn from(a: [u8; 3], pos: usize) -> Result<Components, DecodeErrors> {
        let horizontal_sample = usize::from(a[1] >> 4);
        let vertical_sample = usize::from(a[1] & 0x0f);
        let quantization_table_number = a[2];

        if !(1..=MAX_SAMPLING_FACTOR).contains(&horizontal_sample)
            || !(1..=MAX_SAMPLING_FACTOR).contains(&vertical_sample)
        {
            return Err(DecodeErrors::SofError(format!(
                "Invalid sampling factors ({horizontal_sample},{vertical_sample}) for component {}, expected values between 1 and {MAX_SAMPLING_FACTOR}",
                a[0]
            )));
        }

        if usize::from(quantization_table_number) >= MAX_COMPONENTS {
            return Err(DecodeErrors::SofError(format!(
                "Too large quantization number :{quantization_table_number}, expected value between 0 and {}",
                MAX_COMPONENTS - 1
            )));
        }

        Ok(Components {
            id: a[0],
            position: pos,
            horizontal_sample,
            vertical_sample,
            quantization_table_number,
            quantization_table: [0; 64],
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
            width: 0,
            height: 0,
            blocks_per_line: 0,
            block_rows: 0,
            coefficients: Vec::new()
        })
    }

    /// Size the component for an image of `width`x`height` pixels, `h_max` and
    /// `v_max` being the largest sampling factors of the frame.
    ///
    /// Allocates the coefficient store for the padded block grid
    pub fn setup(
        &mut self, width: usize, height: usize, h_max: usize, v_max: usize, mcu_x: usize,
        mcu_y: usize
    ) {
        self.width = (width * self.horizontal_sample + h_max - 1) / h_max;
        self.height = (height * self.vertical_sample + v_max - 1) / v_max;

        self.blocks_per_line = mcu_x * self.horizontal_sample;
        self.block_rows = mcu_y * self.vertical_sample;

        self.coefficients = vec![0; self.blocks_per_line * self.block_rows * 64];
    }

    /// Number of blocks per line and block rows a non-interleaved scan of
    /// this component covers
    pub const fn scan_blocks(&self) -> (usize, usize) {
        ((self.width + 7) / 8, (self.height + 7) / 8)
    }

    /// The coefficients of the block at `(x, y)` of the padded grid
    pub fn block_mut(&mut self, x: usize, y: usize) -> &mut [i16] {
        let start = (y * self.blocks_per_line + x) * 64;
        &mut self.coefficients[start..start + 64]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_from_sof_bytes() {
        let comp = Components::from([2, 0x21, 1], 1).unwrap();

        assert_eq!(comp.id, 2);
        assert_eq!(comp.horizontal_sample, 2);
        assert_eq!(comp.vertical_sample, 1);
        assert_eq!(comp.quantization_table_number, 1);
    }

    #[test]
    fn bad_sampling_factors() {
        assert!(Components::from([1, 0x01, 0], 0).is_err());
        assert!(Components::from([1, 0x50, 0], 0).is_err());
        assert!(Components::from([1, 0x11, 4], 0).is_err());
    }

    #[test]
    fn chroma_dimensions_round_up() {
        // 4:2:0 chroma of a 37x23 image
        let mut comp = Components::from([2, 0x11, 1], 1).unwrap();
        comp.setup(37, 23, 2, 2, 3, 2);

        assert_eq!((comp.width, comp.height), (19, 12));
        assert_eq!(comp.scan_blocks(), (3, 2));
        assert_eq!((comp.blocks_per_line, comp.block_rows), (3, 2));
        assert_eq!(comp.coefficients.len(), 3 * 2 * 64);
    }
}
