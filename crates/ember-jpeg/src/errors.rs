/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Contains most common errors that may be encountered in decoding a Decoder
//! image

use core::fmt::{Debug, Display, Formatter};

use ember_core::bytestream::ByteIoError;
use ember_core::errors::ErrorKind;
use ember_core::huffman::HuffmanErrors;

use crate::misc::{
    START_OF_FRAME_EXT_AR, START_OF_FRAME_LOS_SEQ, START_OF_FRAME_LOS_SEQ_AR,
    START_OF_FRAME_PROG_DCT, START_OF_FRAME_PROG_DCT_AR
};

/// Common Decode errors
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors {
    /// Any other thing we do not know
    Format(String),
    /// Any other thing we do not know but we
    /// don't need to allocate space on the heap
    FormatStatic(&'static str),
    /// Illegal Magic Bytes
    IllegalMagicBytes(u16),
    /// problems with the Huffman Tables in a Decoder file
    HuffmanDecode(String),
    /// Image has zero width
    ZeroError,
    /// Discrete Quantization Tables error
    DqtError(String),
    /// Start of scan errors
    SosError(String),
    /// Start of frame errors
    SofError(String),
    /// Errors decoding the entropy coded data
    MCUError(String),
    /// A restart marker was expected but something else was found
    RstError(String),
    /// A coding process this library does not decode
    Unsupported(UnsupportedSchemes),
    /// A structurally valid feature this library does not decode
    UnsupportedFeature(&'static str),
    /// The image ran out of bytes while reading headers
    ByteIo(ByteIoError),
    /// Bad Huffman tables or codes
    Huffman(HuffmanErrors)
}

impl DecodeErrors {
    /// Classify the error as corrupt input or an unsupported feature
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsupported(_) | Self::UnsupportedFeature(_) => ErrorKind::Unsupported,
            Self::Huffman(err) => err.kind(),
            _ => ErrorKind::Corrupt
        }
    }
}

impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match &self {
            Self::Format(ref a) => write!(f, "{a:?}"),
            Self::FormatStatic(a) => write!(f, "{:?}", &a),

            Self::HuffmanDecode(ref reason) => {
                write!(f, "Error decoding huffman values: {reason}")
            }
            Self::ZeroError => write!(f, "Image width or height is set to zero, cannot continue"),
            Self::DqtError(ref reason) => write!(f, "Error parsing DQT segment. Reason:{reason}"),
            Self::SosError(ref reason) => write!(f, "Error parsing SOS Segment. Reason:{reason}"),
            Self::SofError(ref reason) => write!(f, "Error parsing SOF segment. Reason:{reason}"),
            Self::IllegalMagicBytes(bytes) => {
                write!(f, "Error parsing image. Illegal start bytes:{bytes:X}")
            }
            Self::MCUError(ref reason) => write!(f, "Error in decoding MCU. Reason {reason}"),
            Self::RstError(ref reason) => write!(f, "Error handling restart marker. Reason {reason}"),
            Self::Unsupported(ref image_type) => {
                write!(f, "{image_type:?}")
            }
            Self::UnsupportedFeature(feature) => write!(f, "Unsupported feature: {feature}"),
            Self::ByteIo(err) => write!(f, "{err:?}"),
            Self::Huffman(err) => write!(f, "{err:?}")
        }
    }
}

impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for DecodeErrors {}

impl From<&'static str> for DecodeErrors {
    fn from(data: &'static str) -> Self {
        Self::FormatStatic(data)
    }
}

impl From<ByteIoError> for DecodeErrors {
    fn from(data: ByteIoError) -> Self {
        Self::ByteIo(data)
    }
}

impl From<HuffmanErrors> for DecodeErrors {
    fn from(data: HuffmanErrors) -> Self {
        Self::Huffman(data)
    }
}

/// Coding processes of ITU-T.81 that are recognised but not decoded
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes {
    /// SOF_2 Progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// SOF_3 Lossless (sequential), Huffman coding
    LosslessHuffman,
    /// SOF_9 Extended sequential DCT, arithmetic coding
    ExtendedSequentialDctArithmetic,
    /// SOF_10 Progressive DCT, arithmetic coding
    ProgressiveDctArithmetic,
    /// SOF_11 Lossless (sequential), arithmetic coding
    LosslessArithmetic,
    /// SOF_5..7 and SOF_13..15, differential (hierarchical) frames
    Hierarchical
}

impl Debug for UnsupportedSchemes {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match &self {
            Self::ProgressiveDctHuffman => {
                write!(f, "The library cannot yet decode progressive images")
            }
            Self::LosslessHuffman => {
                write!(f, "The library cannot yet decode images encoded using Lossless Huffman encoding scheme.")
            }
            Self::ExtendedSequentialDctArithmetic => {
                write!(f, "The library cannot yet decode images encoded using Extended Sequential DCT Arithmetic scheme")
            }
            Self::ProgressiveDctArithmetic => {
                write!(f, "The library cannot yet decode images encoded using Progressive DCT Arithmetic scheme")
            }
            Self::LosslessArithmetic => {
                write!(f, "The library cannot yet decode images encoded using Lossless Arithmetic encoding scheme")
            }
            Self::Hierarchical => {
                write!(f, "The library cannot decode hierarchical (differential) frames")
            }
        }
    }
}

impl UnsupportedSchemes {
    /// Create an unsupported scheme from the low byte of a `SOF` marker
    #[must_use]
    pub fn from_int(int: u8) -> Option<UnsupportedSchemes> {
        let int = u16::from_be_bytes([0xff, int]);

        match int {
            START_OF_FRAME_PROG_DCT => Some(Self::ProgressiveDctHuffman),
            START_OF_FRAME_PROG_DCT_AR => Some(Self::ProgressiveDctArithmetic),
            START_OF_FRAME_LOS_SEQ => Some(Self::LosslessHuffman),
            START_OF_FRAME_LOS_SEQ_AR => Some(Self::LosslessArithmetic),
            START_OF_FRAME_EXT_AR => Some(Self::ExtendedSequentialDctArithmetic),
            0xffc5..=0xffc7 | 0xffcd..=0xffcf => Some(Self::Hierarchical),
            _ => None
        }
    }
}
