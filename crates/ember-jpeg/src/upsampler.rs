/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Up-sampling routines
//!
//! Down-sampled components are stretched to the full image size by
//! bilinear interpolation. Sample centres are aligned, so for a factor of
//! two every output sample takes 3/4 of its nearest input sample and 1/4
//! of the next nearest, the same weights libjpeg's fancy up-sampling uses.

/// Where an output sample reads from: two input indices and the weight
/// of the second
#[derive(Copy, Clone, Debug)]
struct Tap {
    near:   usize,
    far:    usize,
    weight: f32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn taps(out_len: usize, in_len: usize, ratio: usize) -> Vec<Tap> {
    let last = in_len.saturating_sub(1);

    (0..out_len)
        .map(|i| {
            let position = (i as f32 + 0.5) / ratio as f32 - 0.5;

            if position <= 0.0 {
                return Tap {
                    near:   0,
                    far:    0,
                    weight: 0.0
                };
            }
            let near = (position.floor() as usize).min(last);

            Tap {
                near,
                far: (near + 1).min(last),
                weight: position - position.floor()
            }
        })
        .collect()
}

/// Stretch a component plane to `width`x`height`.
///
/// `input` holds `in_width`x`in_height` meaningful samples on lines
/// `stride` bytes apart, `h_ratio` and `v_ratio` are the integer scale
/// factors in each direction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn upsample(
    input: &[u8], stride: usize, in_width: usize, in_height: usize, h_ratio: usize,
    v_ratio: usize, width: usize, height: usize
) -> Vec<u8> {
    let x_taps = taps(width, in_width, h_ratio);
    let y_taps = taps(height, in_height, v_ratio);

    let mut output = vec![0_u8; width * height];

    for (y_tap, out_line) in y_taps.iter().zip(output.chunks_exact_mut(width)) {
        let top = &input[y_tap.near * stride..];
        let bottom = &input[y_tap.far * stride..];

        for (x_tap, out) in x_taps.iter().zip(out_line.iter_mut()) {
            let lerp = |line: &[u8]| {
                let a = f32::from(line[x_tap.near]);
                let b = f32::from(line[x_tap.far]);
                a + (b - a) * x_tap.weight
            };
            let (t, b) = (lerp(top), lerp(bottom));

            *out = (t + (b - t) * y_tap.weight).round().clamp(0.0, 255.0) as u8;
        }
    }
    output
}
