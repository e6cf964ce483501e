/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the decoder understands, see table 5.3 of
/// the png spec, https://www.w3.org/TR/2003/REC-PNG-20031110/
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    tRNS,
    unkn
}

impl PngChunkType {
    pub fn from_bytes(bytes: &[u8; 4]) -> PngChunkType {
        match bytes {
            b"IHDR" => PngChunkType::IHDR,
            b"PLTE" => PngChunkType::PLTE,
            b"IDAT" => PngChunkType::IDAT,
            b"IEND" => PngChunkType::IEND,
            b"tRNS" => PngChunkType::tRNS,
            _ => PngChunkType::unkn
        }
    }
}

/// Return true if a chunk is critical, i.e a decoder must
/// understand it to display the image.
///
/// Critical chunks have bit 5 of their first byte unset (an uppercase letter)
pub const fn is_critical(chunk: [u8; 4]) -> bool {
    chunk[0] & (1 << 5) == 0
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline, special
    PaethFirst,
    AvgFirst
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum InterlaceMethod {
    #[default]
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PngColor {
    #[default]
    Luma,
    Palette,
    LumaA,
    RGB,
    RGBA
}

impl PngColor {
    pub const fn num_components(self) -> u8 {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    pub(crate) fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    /// Return true if `depth` is a legal bit depth for this color type
    pub(crate) const fn is_valid_depth(self, depth: u8) -> bool {
        match self {
            PngColor::Luma => matches!(depth, 1 | 2 | 4 | 8 | 16),
            PngColor::Palette => matches!(depth, 1 | 2 | 4 | 8),
            PngColor::LumaA | PngColor::RGB | PngColor::RGBA => matches!(depth, 8 | 16)
        }
    }
}
