/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during png operations
use core::fmt::{Debug, Display, Formatter};

use ember_core::bytestream::ByteIoError;
use ember_core::errors::ErrorKind;
use ember_inflate::errors::InflateDecodeErrors;

/// Errors that can occur during png decoding
pub enum PngDecodeErrors {
    /// The first eight bytes are not the png signature
    BadSignature,
    /// Corrupt image, static reason
    GenericStatic(&'static str),
    /// Corrupt image, formatted reason
    Generic(String),
    /// A valid image using a feature we do not implement
    Unsupported(&'static str),
    /// A valid image using a feature we do not implement, formatted reason
    UnsupportedStr(String),
    /// The image ran out of bytes
    ByteIo(ByteIoError),
    /// Errors from inflating `IDAT` data
    ZlibDecodeErrors(InflateDecodeErrors)
}

impl PngDecodeErrors {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsupported(_) | Self::UnsupportedStr(_) => ErrorKind::Unsupported,
            Self::ZlibDecodeErrors(err) => err.kind(),
            _ => ErrorKind::Corrupt
        }
    }
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::Unsupported(val) => writeln!(f, "Unsupported: {val}"),
            Self::UnsupportedStr(val) => writeln!(f, "Unsupported: {val}"),
            Self::ByteIo(err) => writeln!(f, "{err:?}"),
            Self::ZlibDecodeErrors(err) => writeln!(f, "Error decoding idat chunks {err:?}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<ByteIoError> for PngDecodeErrors {
    fn from(val: ByteIoError) -> Self {
        Self::ByteIo(val)
    }
}

impl From<InflateDecodeErrors> for PngDecodeErrors {
    fn from(val: InflateDecodeErrors) -> Self {
        Self::ZlibDecodeErrors(val)
    }
}
