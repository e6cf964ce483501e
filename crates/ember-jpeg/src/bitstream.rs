/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entropy coded segments and per block Huffman decoding.
//!
//! Entropy coded data runs from the end of a `SOS` header up to the next
//! marker. Inside it a `0xFF` data byte is followed by a stuffed `0x00`,
//! and any number of `0xFF` fill bytes may precede a marker.
//! [`read_entropy_segment`] removes both and hands out plain bytes that an
//! MSB first [`BitBuffer`] can consume.

use ember_core::bitstream::BitBuffer;
use ember_core::bytestream::ByteReader;
use ember_core::huffman::HuffmanTree;

use crate::errors::DecodeErrors;
use crate::misc::UN_ZIGZAG;

/// Largest DC magnitude category of 8 bit baseline images
const MAX_DC_CATEGORY: u16 = 11;

/// Copy the entropy coded bytes at the reader's position into `out`,
/// un-stuffing `0xFF 0x00` pairs.
///
/// Returns the byte of the marker that ended the segment, the reader is
/// left after it. `None` means the input ended first.
pub(crate) fn read_entropy_segment(
    stream: &mut ByteReader, out: &mut Vec<u8>
) -> Result<Option<u8>, DecodeErrors> {
    out.clear();

    let data = stream.remaining_bytes();
    let mut pos = 0;
    let mut marker = None;

    while pos < data.len() {
        let byte = data[pos];
        pos += 1;

        if byte != 0xFF {
            out.push(byte);
            continue;
        }
        // skip fill bytes to the first byte that is not 0xFF
        while data.get(pos) == Some(&0xFF) {
            pos += 1;
        }
        match data.get(pos) {
            Some(0x00) => {
                pos += 1;
                out.push(0xFF);
            }
            Some(code) => {
                pos += 1;
                marker = Some(*code);
                break;
            }
            None => break
        }
    }
    stream.skip(pos)?;

    Ok(marker)
}

/// Read `bits` raw bits and undo the magnitude category coding,
/// `None` if the segment ran out
#[inline]
fn receive_extend(stream: &mut BitBuffer, bits: u8) -> Option<i32> {
    if bits == 0 {
        return Some(0);
    }
    let value = stream.take(bits).ok()? as i32;

    if value < (1 << (bits - 1)) {
        Some(value - ((1 << bits) - 1))
    } else {
        Some(value)
    }
}

/// Decode a single 8x8 block into `block`, natural order, still quantized.
///
/// `block` must be zeroed by the caller. `eob_run` carries the number of
/// following blocks whose AC coefficients are all zero.
///
/// Returns `Ok(false)` when the entropy segment ends before the block is
/// complete.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decode_block(
    stream: &mut BitBuffer, dc_table: &HuffmanTree, ac_table: &HuffmanTree, dc_pred: &mut i32,
    eob_run: &mut u32, block: &mut [i16; 64]
) -> Result<bool, DecodeErrors> {
    let Some(category) = dc_table.try_decode(stream)? else {
        return Ok(false);
    };

    if category > MAX_DC_CATEGORY {
        return Err(DecodeErrors::MCUError(format!(
            "Invalid DC magnitude category {category}, expected a value between 0 and {MAX_DC_CATEGORY}"
        )));
    }
    let Some(diff) = receive_extend(stream, category as u8) else {
        return Ok(false);
    };
    *dc_pred = dc_pred.wrapping_add(diff);
    block[0] = clamp_i16(*dc_pred);

    if *eob_run > 0 {
        *eob_run -= 1;
        return Ok(true);
    }

    let mut k = 1;

    while k < 64 {
        let Some(rs) = ac_table.try_decode(stream)? else {
            return Ok(false);
        };
        let run = usize::from(rs >> 4);
        let size = (rs & 0x0f) as u8;

        if size == 0 {
            match run {
                // end of block
                0 => break,
                // sixteen zeroes
                15 => {
                    k += 16;
                    continue;
                }
                _ => {
                    // an end of band run covering this and the next blocks
                    let Some(extra) = stream.take(run as u8).ok() else {
                        return Ok(false);
                    };
                    *eob_run = (1_u32 << run) + extra - 1;
                    break;
                }
            }
        }
        k += run;

        if k > 63 {
            return Err(DecodeErrors::MCUError(format!(
                "Coefficient index {k} outside of the block, corrupt huffman data"
            )));
        }
        let Some(value) = receive_extend(stream, size) else {
            return Ok(false);
        };
        block[UN_ZIGZAG[k]] = clamp_i16(value);
        k += 1;
    }
    Ok(true)
}

#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
