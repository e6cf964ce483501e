/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Colour conversion to RGBA
//!
//! YCbCr uses the JFIF (full range BT.601) equations.

// Bt.601 full range inverse coefficients
const CR_TO_R: f32 = 1.402;
const CB_TO_G: f32 = 0.344_136;
const CR_TO_G: f32 = 0.714_136;
const CB_TO_B: f32 = 1.772;

/// Limit values to 0 and 255
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp(a: f32) -> u8 {
    a.round().clamp(0.0, 255.0) as u8
}

/// Convert one YCbCr sample to RGB
#[inline]
pub(crate) fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = f32::from(y);
    let cb = f32::from(cb) - 128.0;
    let cr = f32::from(cr) - 128.0;

    let r = y + CR_TO_R * cr;
    let g = y - CB_TO_G * cb - CR_TO_G * cr;
    let b = y + CB_TO_B * cb;

    [clamp(r), clamp(g), clamp(b)]
}

/// Convert full size YCbCr planes to RGBA
pub(crate) fn ycbcr_to_rgba(y: &[u8], cb: &[u8], cr: &[u8], output: &mut [u8]) {
    for (((y, cb), cr), out) in y
        .iter()
        .zip(cb.iter())
        .zip(cr.iter())
        .zip(output.chunks_exact_mut(4))
    {
        let [r, g, b] = ycbcr_to_rgb(*y, *cb, *cr);

        out.copy_from_slice(&[r, g, b, 255]);
    }
}

/// Interleave full size R, G and B planes into RGBA
pub(crate) fn rgb_to_rgba(r: &[u8], g: &[u8], b: &[u8], output: &mut [u8]) {
    for (((r, g), b), out) in r
        .iter()
        .zip(g.iter())
        .zip(b.iter())
        .zip(output.chunks_exact_mut(4))
    {
        out.copy_from_slice(&[*r, *g, *b, 255]);
    }
}

/// Replicate a luma plane into RGBA
pub(crate) fn luma_to_rgba(luma: &[u8], output: &mut [u8]) {
    for (y, out) in luma.iter().zip(output.chunks_exact_mut(4)) {
        out.copy_from_slice(&[*y, *y, *y, 255]);
    }
}
