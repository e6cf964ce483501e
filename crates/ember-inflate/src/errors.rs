/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when decoding deflate/zlib streams
use core::fmt::{Debug, Display, Formatter};

use ember_core::bitstream::BitStreamError;
use ember_core::errors::ErrorKind;
use ember_core::huffman::HuffmanErrors;

/// Possible errors that may occur when decompressing
pub enum InflateDecodeErrors {
    /// The input ended before the stream did
    InsufficientData,
    /// Generic error with a static reason
    Generic(&'static str),
    /// Generic error with a formatted reason
    GenericStr(String),
    /// `LEN` and `NLEN` of a stored block are not complements
    StoredLengthMismatch { len: u16, nlen: u16 },
    /// A back reference points before the start of the output
    DistanceTooFar { distance: usize, available: usize },
    /// Output would grow past the configured limit
    OutputLimitExceeded(usize, usize),
    /// Adler32 checksum mismatch, (expected, found)
    MismatchedAdler(u32, u32),
    /// A valid stream using a feature we do not implement
    Unsupported(&'static str),
    /// Errors from the bit reader
    BitStream(BitStreamError),
    /// Errors from building or walking a Huffman tree
    Huffman(HuffmanErrors)
}

impl InflateDecodeErrors {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Huffman(err) => err.kind(),
            Self::BitStream(err) => err.kind(),
            _ => ErrorKind::Corrupt
        }
    }
}

impl Debug for InflateDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientData => writeln!(f, "Insufficient data"),
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}"),
            Self::StoredLengthMismatch { len, nlen } => writeln!(
                f,
                "Stored block length {len:#06X} does not match its complement {nlen:#06X}"
            ),
            Self::DistanceTooFar {
                distance,
                available
            } => writeln!(
                f,
                "Back reference distance {distance} larger than the {available} bytes decoded"
            ),
            Self::OutputLimitExceeded(limit, current) => writeln!(
                f,
                "Output limit exceeded, set limit was {limit} and output size is {current}"
            ),
            Self::MismatchedAdler(expected, found) => {
                writeln!(f, "Mismatched Adler, expected {expected} but found {found}")
            }
            Self::Unsupported(reason) => writeln!(f, "Unsupported: {reason}"),
            Self::BitStream(err) => writeln!(f, "{err:?}"),
            Self::Huffman(err) => writeln!(f, "{err:?}")
        }
    }
}

impl Display for InflateDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for InflateDecodeErrors {}

impl From<BitStreamError> for InflateDecodeErrors {
    fn from(value: BitStreamError) -> Self {
        match value {
            BitStreamError::NotEnoughBits { .. } | BitStreamError::NotEnoughBytes { .. } => {
                InflateDecodeErrors::InsufficientData
            }
            _ => InflateDecodeErrors::BitStream(value)
        }
    }
}

impl From<HuffmanErrors> for InflateDecodeErrors {
    fn from(value: HuffmanErrors) -> Self {
        match value {
            HuffmanErrors::BitStream(err) => InflateDecodeErrors::from(err),
            _ => InflateDecodeErrors::Huffman(value)
        }
    }
}
