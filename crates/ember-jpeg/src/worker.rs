/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Post processing, turning coefficients into RGBA pixels
use ember_core::log::trace;
use ember_core::result::DecodedImage;

use crate::color_convert::{luma_to_rgba, rgb_to_rgba, ycbcr_to_rgba};
use crate::components::Components;
use crate::idct::dequantize_and_idct;
use crate::upsampler::upsample;
use crate::JpegDecoder;

/// Run the IDCT over every block of `component` and return its samples
/// stretched or cropped to `width`x`height`
fn component_plane(
    component: &Components, h_max: usize, v_max: usize, width: usize, height: usize
) -> Vec<u8> {
    let stride = component.blocks_per_line * 8;
    let mut plane = vec![0_u8; stride * component.block_rows * 8];
    // blocks past these only pad the MCU grid
    let (blocks_x, blocks_y) = component.scan_blocks();

    for block_y in 0..blocks_y {
        for block_x in 0..blocks_x {
            let start = (block_y * component.blocks_per_line + block_x) * 64;
            let coefficients = &component.coefficients[start..start + 64];

            let out = &mut plane[block_y * 8 * stride + block_x * 8..];

            dequantize_and_idct(coefficients, &component.quantization_table, out, stride);
        }
    }

    if component.horizontal_sample == h_max && component.vertical_sample == v_max {
        let mut output = Vec::with_capacity(width * height);

        for line in plane.chunks_exact(stride).take(height) {
            output.extend_from_slice(&line[..width]);
        }
        return output;
    }
    trace!(
        "Up-sampling component {} from {}x{}",
        component.id,
        component.width,
        component.height
    );
    upsample(
        &plane,
        stride,
        component.width,
        component.height,
        h_max / component.horizontal_sample,
        v_max / component.vertical_sample,
        width,
        height
    )
}

impl<'a> JpegDecoder<'a> {
    /// Whether three components hold RGB rather than YCbCr
    pub(crate) fn is_rgb(&self) -> bool {
        match self.adobe_transform {
            Some(transform) => transform == 0,
            // libjpeg's heuristic for unmarked images
            None => {
                let ids: Vec<u8> = self.components.iter().map(|c| c.id).collect();
                ids == b"RGB"
            }
        }
    }

    /// Convert the decoded coefficients into an RGBA image
    pub(crate) fn post_process(&self) -> DecodedImage {
        let width = usize::from(self.info.width);
        let height = usize::from(self.info.height);

        let planes: Vec<Vec<u8>> = self
            .components
            .iter()
            .map(|c| component_plane(c, self.h_max, self.v_max, width, height))
            .collect();

        let mut pixels = vec![0_u8; width * height * DecodedImage::COMPONENTS];

        match planes.as_slice() {
            [luma] => luma_to_rgba(luma, &mut pixels),
            [r, g, b] if self.is_rgb() => rgb_to_rgba(r, g, b, &mut pixels),
            [y, cb, cr] => ycbcr_to_rgba(y, cb, cr, &mut pixels),
            // other layouts are rejected before decoding starts
            _ => unreachable!("unsupported component count {}", planes.len())
        }
        DecodedImage::new(width, height, pixels)
    }
}
