/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline de-filtering
//!
//! Each function reverses one png filter type for a single row.
//! `raw` is the filtered row without its filter byte, `current` receives the
//! reconstructed row and `prev_row` is the previous reconstructed row.
//! `components` is the filter byte distance, the number of bytes per
//! complete pixel rounded up to one.
//!
//! All arithmetic wraps around modulo 256.

pub fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len());
    let components = components.min(end);

    // handle leftmost byte explicitly
    current[..components].copy_from_slice(&raw[..components]);

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current.iter_mut()).zip(prev_row) {
        *recon = filt.wrapping_add(*up);
    }
}

pub fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let components = components.min(end);

    // handle leftmost byte explicitly
    for i in 0..components {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }

    for i in components..end {
        let a = current[i - components];
        let b = prev_row[i];

        // find average, with overflow handling
        // from standford bit-hacks.
        let c = (a & b) + ((a ^ b) >> 1);

        current[i] = raw[i].wrapping_add(c);
    }
}

/// Average filter for the first row, the row above is all zeroes
pub fn handle_avg_first(raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len());
    let components = components.min(end);

    current[..components].copy_from_slice(&raw[..components]);

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a >> 1);
    }
}

pub fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let components = components.min(end);

    // the leftmost pixel has no left or upper left neighbour, paeth(0, b, 0) is b
    for i in 0..components {
        current[i] = raw[i].wrapping_add(prev_row[i]);
    }

    for i in components..end {
        let paeth = paeth(current[i - components], prev_row[i], prev_row[i - components]);
        current[i] = raw[i].wrapping_add(paeth);
    }
}

/// Paeth filter for the first row
///
/// With `b` and `c` zero, the predictor always picks `a`, making this
/// a sub filter.
pub fn handle_paeth_first(raw: &[u8], current: &mut [u8], components: usize) {
    handle_sub(raw, current, components);
}

/// The paeth predictor, ties are broken in the order `a`, `b`, `c`
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        return a as u8;
    }
    if pb <= pc {
        return b as u8;
    }
    c as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paeth_prefers_a_then_b_then_c() {
        // all equal distance
        assert_eq!(paeth(10, 10, 10), 10);
        // p = 30, pa = 10, pb = 10, pc = 20, tie goes to a
        assert_eq!(paeth(20, 20, 10), 20);
        // p = 8, pa = 3, pb = 2, pc = 1
        assert_eq!(paeth(5, 10, 7), 7);
        // p = 10, pa = 10, pb = 0
        assert_eq!(paeth(0, 10, 0), 10);
        assert_eq!(paeth(100, 0, 0), 100);
    }

    #[test]
    fn sub_wraps() {
        let raw = [200, 100, 1, 255];
        let mut out = [0; 4];

        handle_sub(&raw, &mut out, 1);
        assert_eq!(out, [200, 44, 45, 44]);
    }

    #[test]
    fn avg_uses_floor() {
        let prev = [3, 5, 255, 255];
        let raw = [1, 1, 0, 0];
        let mut out = [0; 4];

        handle_avg(&prev, &raw, &mut out, 2);
        // 1 + 3/2, 1 + 5/2, 0 + (2 + 255)/2, 0 + (3 + 255)/2
        assert_eq!(out, [2, 3, 128, 129]);
    }

    #[test]
    fn zero_delta_paeth_rows_keep_prediction() {
        // a 2x2 gray image whose filtered bytes are all zero
        // reconstructs to all zeroes for every filter
        let prev = [0, 0];
        let raw = [0, 0];

        let mut first = [9, 9];
        handle_paeth_first(&raw, &mut first, 1);
        assert_eq!(first, [0, 0]);

        let mut second = [9, 9];
        handle_paeth(&prev, &raw, &mut second, 1);
        assert_eq!(second, [0, 0]);

        // with a non zero row above, paeth predicts from it unchanged
        let prev = [7, 7];
        let mut third = [0, 0];
        handle_paeth(&prev, &raw, &mut third, 1);
        assert_eq!(third, [7, 7]);
    }
}
