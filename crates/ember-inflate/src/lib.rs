/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A small deflate decoder.
//!
//! This crate decodes raw DEFLATE (RFC 1951) streams and their zlib
//! (RFC 1950) wrapping, it is what the PNG decoder uses to inflate `IDAT` data.
//!
//! Codes are decoded one bit at a time with the canonical Huffman trees
//! from `ember-core`, favouring simplicity over speed.
//!
//! # Usage
//!
//! Decoding deflate data
//!
//! ```no_run
//! use ember_inflate::DeflateDecoder;
//! let totally_valid_data = [0;23];
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//!
//! let decompressed = decoder.decode_deflate();
//! ```
//!
//! Decoding zlib data
//! ```no_run
//! use ember_inflate::DeflateDecoder;
//! let totally_valid_data = [0;23];
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//!
//! let decompressed = decoder.decode_zlib();
//! ```
//!
//! Decoding zlib data without confirming the adler32 checksum
//! ```no_run
//! use ember_inflate::DeflateDecoder;
//! use ember_inflate::DeflateOptions;
//! let totally_valid_data = [0;23];
//! let options = DeflateOptions::default()
//!                     .set_confirm_checksum(false);
//! let mut decoder = DeflateDecoder::new_with_options(&totally_valid_data, options);
//!
//! let decompressed = decoder.decode_zlib();
//! ```
pub use crate::decoder::{DeflateDecoder, DeflateOptions};

mod constants;
mod decoder;
pub mod errors;
