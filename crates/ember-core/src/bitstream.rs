/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! `BitBuffer` API
//!
//! A bit reader over an in-memory byte slice.
//!
//! DEFLATE packs its bits starting at the least significant bit of each byte,
//! JPEG starts at the most significant one, so the reader carries a [`BitOrder`]
//! and fills its accumulator accordingly.
//!
//! The reader only pulls whole bytes, and only when a read needs them,
//! so the backing slice can be handed back for byte level copies after
//! [`BitBuffer::align_to_byte`]. JPEG byte stuffing is *not* handled here,
//! the JPEG decoder removes stuffed bytes before creating a reader.
use core::fmt::{Debug, Display, Formatter};

use crate::errors::ErrorKind;

/// Widest read supported by [`BitBuffer::peek`] and [`BitBuffer::take`]
pub const MAX_READ_BITS: u8 = 32;

/// Order in which bits are taken out of a byte
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BitOrder {
    /// Least significant bit first (DEFLATE)
    Lsb,
    /// Most significant bit first (JPEG)
    Msb
}

/// Errors raised by [`BitBuffer`]
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum BitStreamError {
    /// The input was exhausted before `requested` bits were available
    NotEnoughBits { requested: u8, available: u8 },
    /// A byte aligned copy asked for more bytes than are left
    NotEnoughBytes { requested: usize, available: usize },
    /// More than [`MAX_READ_BITS`] were requested in one read
    TooWide(u8)
}

impl BitStreamError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Corrupt
    }
}

impl Debug for BitStreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BitStreamError::NotEnoughBits {
                requested,
                available
            } => write!(
                f,
                "Not enough bits in stream, requested {requested} but only {available} available"
            ),
            BitStreamError::NotEnoughBytes {
                requested,
                available
            } => write!(
                f,
                "Not enough bytes in stream, requested {requested} but only {available} available"
            ),
            BitStreamError::TooWide(bits) => write!(
                f,
                "Cannot read {bits} bits at once, maximum is {MAX_READ_BITS}"
            )
        }
    }
}

impl Display for BitStreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for BitStreamError {}

pub struct BitBuffer<'src> {
    // buffer from which we are pulling in bits from
    src:       &'src [u8],
    // next byte to pull into the accumulator
    position:  usize,
    // number of valid bits in `buffer`, never above 39
    bits_left: u8,
    buffer:    u64,
    order:     BitOrder
}

impl<'src> BitBuffer<'src> {
    /// Create a new reader pulling bits from `src` in `order`
    pub const fn new(src: &'src [u8], order: BitOrder) -> BitBuffer<'src> {
        BitBuffer {
            src,
            position: 0,
            bits_left: 0,
            buffer: 0,
            order
        }
    }

    /// Create a reader handing out bits least significant bit first
    pub const fn new_lsb(src: &'src [u8]) -> BitBuffer<'src> {
        BitBuffer::new(src, BitOrder::Lsb)
    }

    /// Create a reader handing out bits most significant bit first
    pub const fn new_msb(src: &'src [u8]) -> BitBuffer<'src> {
        BitBuffer::new(src, BitOrder::Msb)
    }

    pub const fn order(&self) -> BitOrder {
        self.order
    }

    /// Pull whole bytes into the accumulator until at least `bits`
    /// are buffered or the input is exhausted.
    ///
    /// Returns true if `bits` bits are available
    #[inline]
    pub fn ensure(&mut self, bits: u8) -> bool {
        while self.bits_left < bits {
            let Some(byte) = self.src.get(self.position) else {
                return false;
            };
            match self.order {
                BitOrder::Lsb => self.buffer |= u64::from(*byte) << self.bits_left,
                BitOrder::Msb => self.buffer = (self.buffer << 8) | u64::from(*byte)
            }
            self.bits_left += 8;
            self.position += 1;
        }
        true
    }

    #[inline]
    fn check(&mut self, bits: u8) -> Result<(), BitStreamError> {
        if bits > MAX_READ_BITS {
            return Err(BitStreamError::TooWide(bits));
        }
        if !self.ensure(bits) {
            return Err(BitStreamError::NotEnoughBits {
                requested: bits,
                available: self.bits_left
            });
        }
        Ok(())
    }

    #[inline(always)]
    const fn mask(bits: u8) -> u64 {
        (1_u64 << bits) - 1
    }

    /// Return the next `bits` bits without consuming them
    ///
    /// For LSB order the first bit in the stream is bit 0 of the result,
    /// for MSB order it is the most significant of the `bits` returned.
    #[inline]
    pub fn peek(&mut self, bits: u8) -> Result<u32, BitStreamError> {
        self.check(bits)?;

        let value = match self.order {
            BitOrder::Lsb => self.buffer & Self::mask(bits),
            BitOrder::Msb => (self.buffer >> (self.bits_left - bits)) & Self::mask(bits)
        };
        Ok(value as u32)
    }

    /// Return the next `bits` bits and consume them
    #[inline]
    pub fn take(&mut self, bits: u8) -> Result<u32, BitStreamError> {
        let value = self.peek(bits)?;
        self.drop_bits(bits);
        Ok(value)
    }

    /// Read a single bit
    #[inline]
    pub fn take_bit(&mut self) -> Result<u32, BitStreamError> {
        self.take(1)
    }

    #[inline(always)]
    fn drop_bits(&mut self, bits: u8) {
        debug_assert!(bits <= self.bits_left);

        if self.order == BitOrder::Lsb {
            self.buffer >>= bits;
        }
        self.bits_left -= bits;
        self.buffer &= Self::mask(self.bits_left);
    }

    /// Discard buffered bits up to the next byte boundary of the input
    pub fn align_to_byte(&mut self) {
        let extra = self.bits_left % 8;
        self.drop_bits(extra);
    }

    /// Copy `length` whole bytes into `out`.
    ///
    /// The reader must be byte aligned. Bytes still sitting in the
    /// accumulator are handed out first, the rest comes straight
    /// from the backing slice.
    pub fn read_aligned_bytes(
        &mut self, length: usize, out: &mut Vec<u8>
    ) -> Result<(), BitStreamError> {
        debug_assert_eq!(self.bits_left % 8, 0);

        let buffered = usize::from(self.bits_left / 8);
        let available = buffered + self.remaining_bytes();

        if length > available {
            return Err(BitStreamError::NotEnoughBytes {
                requested: length,
                available
            });
        }
        let from_buffer = length.min(buffered);

        for _ in 0..from_buffer {
            let byte = self.take(8)?;
            out.push(byte as u8);
        }
        let rest = length - from_buffer;

        out.extend_from_slice(&self.src[self.position..self.position + rest]);
        self.position += rest;

        Ok(())
    }

    /// Number of bits currently held in the accumulator
    pub const fn bits_left(&self) -> u8 {
        self.bits_left
    }

    /// Number of bytes pulled from the input so far
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of input bytes not yet pulled into the accumulator
    pub const fn remaining_bytes(&self) -> usize {
        self.src.len() - self.position
    }

    /// Total bits left, buffered and unbuffered
    pub const fn total_bits_left(&self) -> usize {
        self.remaining_bytes() * 8 + self.bits_left as usize
    }

    /// True when both the input and the accumulator are empty
    pub const fn eof(&self) -> bool {
        self.position >= self.src.len() && self.bits_left == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [u8; 12] = [
        0xA5, 0x3C, 0xFF, 0x00, 0x81, 0x7E, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC
    ];

    #[test]
    fn lsb_reads_from_low_bits() {
        let mut reader = BitBuffer::new_lsb(&[0b1011_0001, 0xFF]);

        assert_eq!(reader.take(1).unwrap(), 1);
        assert_eq!(reader.take(3).unwrap(), 0b000);
        assert_eq!(reader.take(4).unwrap(), 0b1011);
        assert_eq!(reader.take(8).unwrap(), 0xFF);
        assert!(reader.eof());
    }

    #[test]
    fn msb_reads_from_high_bits() {
        let mut reader = BitBuffer::new_msb(&[0b1011_0001, 0x0F]);

        assert_eq!(reader.take(1).unwrap(), 1);
        assert_eq!(reader.take(3).unwrap(), 0b011);
        assert_eq!(reader.take(8).unwrap(), 0b0001_0000);
        assert_eq!(reader.take(4).unwrap(), 0xF);
        assert!(reader.eof());
    }

    #[test]
    fn split_takes_match_single_take() {
        for order in [BitOrder::Lsb, BitOrder::Msb] {
            for skip in 0..8 {
                for n in 0..=32_u8 {
                    for m in 0..=(32 - n) {
                        let mut whole = BitBuffer::new(&DATA, order);
                        let mut split = BitBuffer::new(&DATA, order);

                        whole.take(skip).unwrap();
                        split.take(skip).unwrap();

                        let joined = u64::from(whole.take(n + m).unwrap());
                        let first = u64::from(split.take(n).unwrap());
                        let second = u64::from(split.take(m).unwrap());

                        let expected = match order {
                            BitOrder::Lsb => first | (second << n),
                            BitOrder::Msb => (first << m) | second
                        };
                        assert_eq!(joined, expected, "{order:?} skip={skip} n={n} m={m}");
                    }
                }
            }
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = BitBuffer::new_msb(&DATA);

        assert_eq!(reader.peek(12).unwrap(), 0xA53);
        assert_eq!(reader.peek(12).unwrap(), 0xA53);
        assert_eq!(reader.take(12).unwrap(), 0xA53);
        assert_eq!(reader.take(4).unwrap(), 0xC);
    }

    #[test]
    fn wide_reads_are_rejected() {
        let mut reader = BitBuffer::new_lsb(&DATA);

        assert_eq!(reader.peek(33), Err(BitStreamError::TooWide(33)));
        assert!(reader.take(32).is_ok());
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut reader = BitBuffer::new_lsb(&[0xFF]);

        assert!(reader.take(5).is_ok());
        assert!(!reader.eof());
        let err = reader.take(4).unwrap_err();
        assert_eq!(
            err,
            BitStreamError::NotEnoughBits {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(err.kind(), ErrorKind::Corrupt);
        // the failed read leaves the buffered bits in place
        assert_eq!(reader.take(3).unwrap(), 0b111);
        assert!(reader.eof());
    }

    #[test]
    fn align_and_copy_bytes() {
        let mut reader = BitBuffer::new_lsb(&DATA);

        reader.take(3).unwrap();
        reader.align_to_byte();
        assert_eq!(reader.bits_left(), 0);
        assert_eq!(reader.take(16).unwrap(), 0xFF3C);

        // pull one extra byte into the accumulator before copying
        assert!(reader.ensure(8));
        let mut out = vec![];
        reader.read_aligned_bytes(4, &mut out).unwrap();
        assert_eq!(out, [0x00, 0x81, 0x7E, 0x12]);
        assert_eq!(reader.remaining_bytes(), 5);

        let mut out = vec![];
        assert_eq!(
            reader.read_aligned_bytes(6, &mut out),
            Err(BitStreamError::NotEnoughBytes {
                requested: 6,
                available: 5
            })
        );
        assert!(out.is_empty());
    }
}
