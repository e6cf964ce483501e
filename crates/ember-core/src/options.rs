/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder options
//!
//! This module exposes a struct for which all implemented
//! decoders get shared options for decoding
//!
//! All supported options are put into one DecoderOptions to allow for global configurations
//! options i.e the same  `DecoderOption` can be reused for all other decoders
//!

/// Decoder options
///
/// Not all options are respected by decoders
/// Each option specifies decoders that respect it
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    /// - Respected by: `png`, `jpeg`
    max_width:         usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    /// - Respected by: `png`, `jpeg`
    max_height:        usize,
    /// Treat some recoverable oddities as errors
    ///
    /// When set to false, the decoders log a warning and continue,
    /// e.g. a JPEG whose entropy coded data ends before the last MCU
    /// or a PNG without an `IEND` chunk.
    ///
    /// - Default value: false
    /// - Respected by: `png`, `jpeg`
    strict_mode:       bool,
    /// Whether to confirm the zlib adler32 checksum
    ///
    /// - Default value: true
    /// - Respected by: `png`
    confirm_checksums: bool,
    /// Maximum number of bytes the inflate stage may produce
    ///
    /// - Default value: 1 GiB
    /// - Respected by: `png`
    inflate_limit:     usize
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:         1 << 14,
            max_height:        1 << 14,
            strict_mode:       false,
            confirm_checksums: true,
            inflate_limit:     1 << 30
        }
    }
}

impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// And reject most errors
    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Return true if the decoders should confirm checksums
    pub const fn get_confirm_checksums(&self) -> bool {
        self.confirm_checksums
    }

    /// Maximum number of bytes an inflate call may produce
    pub const fn get_inflate_limit(&self) -> usize {
        self.inflate_limit
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be in strict mode
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    /// Set whether the decoders should confirm checksums
    pub fn set_confirm_checksums(mut self, yes: bool) -> Self {
        self.confirm_checksums = yes;
        self
    }

    /// Set the maximum number of bytes inflate may produce
    pub fn set_inflate_limit(mut self, limit: usize) -> Self {
        self.inflate_limit = limit;
        self
    }
}
