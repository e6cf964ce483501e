/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Dequantization and the inverse DCT
//!
//! A separable floating point transform, one 8 point IDCT over each row
//! followed by one over each column, using a precomputed cosine basis.

use std::sync::OnceLock;

/// `BASIS[x][u] = C(u) / 2 * cos((2x + 1) * u * PI / 16)`, with
/// `C(0) = 1/sqrt(2)` and `C(u) = 1` otherwise
fn basis() -> &'static [[f32; 8]; 8] {
    static BASIS: OnceLock<[[f32; 8]; 8]> = OnceLock::new();

    BASIS.get_or_init(|| {
        let mut table = [[0.0; 8]; 8];

        for (x, row) in table.iter_mut().enumerate() {
            for (u, value) in row.iter_mut().enumerate() {
                let alpha = if u == 0 {
                    core::f64::consts::FRAC_1_SQRT_2
                } else {
                    1.0
                };
                let angle = ((2 * x + 1) * u) as f64 * core::f64::consts::PI / 16.0;

                *value = (alpha * angle.cos() / 2.0) as f32;
            }
        }
        table
    })
}

#[inline(always)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn level_shift(value: f32) -> u8 {
    (value + 128.0).round().clamp(0.0, 255.0) as u8
}

/// Dequantize `coefficients` (natural order) with `qt_table` and write
/// the 8x8 samples to `out`, whose lines are `stride` bytes apart.
///
/// Samples are level shifted by 128 and clamped to `0..=255`.
pub(crate) fn dequantize_and_idct(
    coefficients: &[i16], qt_table: &[u16; 64], out: &mut [u8], stride: usize
) {
    debug_assert_eq!(coefficients.len(), 64);

    if coefficients[1..].iter().all(|x| *x == 0) {
        // flat block, every sample is DC / 8
        let dc = f32::from(coefficients[0]) * f32::from(qt_table[0]);
        let value = level_shift(dc / 8.0);

        for row in out.chunks_mut(stride).take(8) {
            row[..8].fill(value);
        }
        return;
    }
    let basis = basis();

    let mut block = [0.0_f32; 64];

    for ((b, c), q) in block.iter_mut().zip(coefficients).zip(qt_table) {
        *b = f32::from(*c) * f32::from(*q);
    }
    // rows
    let mut temp = [0.0_f32; 64];

    for (in_row, out_row) in block.chunks_exact(8).zip(temp.chunks_exact_mut(8)) {
        for (x, sample) in out_row.iter_mut().enumerate() {
            *sample = in_row.iter().zip(&basis[x]).map(|(c, b)| c * b).sum();
        }
    }
    // columns
    for (y, out_row) in out.chunks_mut(stride).take(8).enumerate() {
        for x in 0..8 {
            let value: f32 = (0..8).map(|v| temp[v * 8 + x] * basis[y][v]).sum();

            out_row[x] = level_shift(value);
        }
    }
}
