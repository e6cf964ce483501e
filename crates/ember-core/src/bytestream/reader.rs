/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use crate::errors::ErrorKind;

/// Byte order used by the multi byte reads of a [`ByteReader`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endian {
    /// Big endian, network order. Used by PNG and JPEG
    BE,
    /// Little endian
    LE
}

/// Errors raised by [`ByteReader`]
pub enum ByteIoError {
    /// A read asked for more bytes than are left in the buffer
    NotEnoughBytes {
        requested: usize,
        remaining: usize,
        position:  usize
    },
    /// A seek or rewind would move the position outside `[0, length]`
    OutOfBounds { target: usize, length: usize }
}

impl ByteIoError {
    /// Running out of bytes in a well formed stream never happens,
    /// so these are always corruption errors
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Corrupt
    }
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::NotEnoughBytes {
                requested,
                remaining,
                position
            } => {
                write!(
                    f,
                    "Not enough bytes at offset {position}, requested {requested} but only {remaining} remain"
                )
            }
            ByteIoError::OutOfBounds { target, length } => {
                write!(
                    f,
                    "Position {target} out of bounds for a buffer of length {length}"
                )
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ByteIoError {}

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// with the exception of adding endian aware reads and
/// borrowing sub-ranges without copying.
///
/// Invariant: `position` is always in `[0, stream.len()]`
pub struct ByteReader<'a> {
    /// Data stream
    stream:   &'a [u8],
    position: usize,
    endian:   Endian
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

impl<'a> ByteReader<'a> {
    /// Create a new instance of the byte stream reading big endian values
    pub const fn new(buf: &'a [u8]) -> ByteReader<'a> {
        ByteReader::new_with_endian(buf, Endian::BE)
    }

    /// Create a new instance which reads multi-byte values in `endian` order
    pub const fn new_with_endian(buf: &'a [u8], endian: Endian) -> ByteReader<'a> {
        ByteReader {
            stream: buf,
            position: 0,
            endian
        }
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    pub const fn get_endian(&self) -> Endian {
        self.endian
    }

    /// Return the current position of the inner cursor.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor to `position`, which may be anywhere in `[0, len]`
    pub fn set_position(&mut self, position: usize) -> Result<(), ByteIoError> {
        if position > self.stream.len() {
            return Err(ByteIoError::OutOfBounds {
                target: position,
                length: self.stream.len()
            });
        }
        self.position = position;
        Ok(())
    }

    /// Total length of the underlying buffer
    pub const fn len(&self) -> usize {
        self.stream.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Get number of bytes available in the stream
    pub const fn remaining(&self) -> usize {
        self.stream.len() - self.position
    }

    /// Return true if the buffer can satisfy `num` bytes without error
    pub const fn has(&self, num: usize) -> bool {
        self.remaining() >= num
    }

    /// Return true whether or not we read to the end of the
    /// buffer and have no more bytes left.
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Skip `num` bytes ahead of the stream.
    pub fn skip(&mut self, num: usize) -> Result<(), ByteIoError> {
        self.check(num)?;
        self.position += num;
        Ok(())
    }

    /// Undo a buffer read by moving the position pointer `num`
    /// bytes behind.
    pub fn rewind(&mut self, num: usize) -> Result<(), ByteIoError> {
        match self.position.checked_sub(num) {
            Some(position) => {
                self.position = position;
                Ok(())
            }
            None => Err(ByteIoError::OutOfBounds {
                target: 0,
                length: self.stream.len()
            })
        }
    }

    #[inline(always)]
    fn check(&self, num: usize) -> Result<(), ByteIoError> {
        if self.has(num) {
            Ok(())
        } else {
            Err(ByteIoError::NotEnoughBytes {
                requested: num,
                remaining: self.remaining(),
                position:  self.position
            })
        }
    }

    /// Read a single byte
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, ByteIoError> {
        self.check(1)?;
        let byte = self.stream[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> Option<u8> {
        self.stream.get(self.position).copied()
    }

    /// Borrow the next `num` bytes and advance past them
    pub fn get_as_ref(&mut self, num: usize) -> Result<&'a [u8], ByteIoError> {
        self.check(num)?;
        let slice = &self.stream[self.position..self.position + num];
        self.position += num;
        Ok(slice)
    }

    /// Look ahead `position` bytes and return a reference to `num_bytes`
    /// from that position.
    ///
    /// This doesn't increment the position.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        let start = self.position.saturating_add(position);
        let end = start.saturating_add(num_bytes);

        self.stream
            .get(start..end)
            .ok_or(ByteIoError::NotEnoughBytes {
                requested: position.saturating_add(num_bytes),
                remaining: self.remaining(),
                position:  self.position
            })
    }

    /// Read exactly `buf.len()` bytes into `buf`
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let bytes = self.get_as_ref(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    /// Read a fixed number of known bytes to an array
    pub fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut byte_store = [0; N];
        self.read_exact_bytes(&mut byte_store)?;
        Ok(byte_store)
    }

    /// Split off a reader over the next `num` bytes
    ///
    /// The new reader inherits our endianness and
    /// this reader moves past the borrowed range.
    pub fn sub_reader(&mut self, num: usize) -> Result<ByteReader<'a>, ByteIoError> {
        let bytes = self.get_as_ref(num)?;
        Ok(ByteReader::new_with_endian(bytes, self.endian))
    }

    /// Return the bytes that have not been read yet
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.stream[self.position..]
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> Result<$int_type, ByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes::<SIZE_OF_VAL>()?;

                match mode {
                    Mode::BE => Ok($int_type::from_be_bytes(space)),
                    Mode::LE => Ok($int_type::from_le_bytes(space))
                }
            }
            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name2(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name(Mode::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name3(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name(Mode::LE)
            }
        }
    };
}

get_single_type!(read_u16_inner, read_u16_be, read_u16_le, u16);
get_single_type!(read_u32_inner, read_u32_be, read_u32_le, u32);
get_single_type!(read_u64_inner, read_u64_be, read_u64_le, u64);

macro_rules! get_endian_type {
    ($name:tt,$be:tt,$le:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a> {
            #[doc=concat!("Read ",stringify!($int_type)," in the endianness this reader was configured with")]
            #[inline]
            pub fn $name(&mut self) -> Result<$int_type, ByteIoError> {
                match self.endian {
                    Endian::BE => self.$be(),
                    Endian::LE => self.$le()
                }
            }
        }
    };
}

get_endian_type!(read_u16, read_u16_be, read_u16_le, u16);
get_endian_type!(read_u32, read_u32_be, read_u32_le, u32);
get_endian_type!(read_u64, read_u64_be, read_u64_le, u64);
