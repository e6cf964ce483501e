/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all ember decoders
//!
//! This crate provides the building blocks the PNG, JPEG and inflate
//! decoders are written on top of.
//!
//! It currently contains
//!
//! - A bounds checked, endian aware byte reader with sub-range readers
//! - A bit reader which can hand out bits LSB-first (DEFLATE) or MSB-first (JPEG)
//! - A canonical Huffman tree builder and bit-at-a-time decoder
//! - Decoder options shared by every decoder
//! - The RGBA image type every image decoder returns
//!
//! # Features
//!  - `log`: Forward the logging macros in [`log`] to the `log` crate.
//!     Without it they are no-ops.
#![macro_use]

pub mod bitstream;
pub mod bytestream;
pub mod errors;
pub mod huffman;
pub mod log;
pub mod options;
pub mod result;
