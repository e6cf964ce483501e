/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//!This crate provides a library for decoding valid
//! ITU-T Rec. T.851 (09/2005) ITU-T T.81 (JPEG-1) or JPEG images.
//!
//! Baseline and extended sequential Huffman coded images with one
//! (grayscale) or three (YCbCr or Adobe RGB) components are decoded,
//! with any sampling factors and restart intervals.
//! Progressive, arithmetic coded, lossless and hierarchical images are
//! recognised and rejected with [`DecodeErrors::Unsupported`](errors::DecodeErrors::Unsupported).
//!
//! Every image is returned as 8 bit RGBA.
//!
//! # Examples
//!
//! ## Decode a JPEG file with default arguments.
//!```no_run
//! use ember_jpeg::JpegDecoder;
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = JpegDecoder::new(&data);
//! let image = decoder.decode().unwrap();
//! assert_eq!(image.data.len(), image.width * image.height * 4);
//! ```
//!
//! ## Decode a JPEG file, rejecting damaged entropy data
//!
//! ```no_run
//! use ember_core::options::DecoderOptions;
//! use ember_jpeg::JpegDecoder;
//!
//! let options = DecoderOptions::default().set_strict_mode(true);
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = JpegDecoder::new_with_options(&data, options);
//! let image = decoder.decode().unwrap();
//! ```
//!
//! ## Read image dimensions without decoding
//!
//! ```no_run
//! use ember_jpeg::JpegDecoder;
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = JpegDecoder::new(&data);
//! decoder.decode_headers().unwrap();
//! let info = decoder.info().unwrap();
//! println!("{}x{}", info.width, info.height);
//! ```
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub use decoder::{ImageInfo, JpegDecoder};
pub use ember_core;
pub use misc::SOFMarkers;

mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod idct;
mod marker;
mod mcu;
mod misc;
mod upsampler;
mod worker;
