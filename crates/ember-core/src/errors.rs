/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Error classification shared by all decoders
//!
//! Every decoder error, whatever crate it comes from, falls into
//! one of two buckets. Both are fatal for the decode call that raised them.

/// The class of a decoding error
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The stream violates the structural rules of its format,
    /// e.g. a bad signature, an invalid prefix code or a
    /// back-reference before the start of the output.
    Corrupt,
    /// The stream is well formed but uses a feature the decoders
    /// do not implement, e.g. interlaced PNG or progressive JPEG.
    Unsupported
}

impl ErrorKind {
    pub const fn is_corrupt(self) -> bool {
        matches!(self, ErrorKind::Corrupt)
    }

    pub const fn is_unsupported(self) -> bool {
        matches!(self, ErrorKind::Unsupported)
    }
}
