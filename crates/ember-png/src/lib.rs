/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png decoder
//!
//! This features a simple PNG reader in Rust which supports decoding of valid,
//! non-interlaced ISO/IEC 15948:2003 (E) or PNG images
//!
//! Every image, whatever its colour type or bit depth, is returned as 8 bit RGBA.
//!
//! # Usage
//!
//! #### Decode to RGBA
//!
//!```no_run
//! use ember_png::PngDecoder;
//! let mut decoder = PngDecoder::new(&[]);
//!
//! let image = decoder.decode().unwrap();
//! println!("{}x{}", image.width, image.height);
//! ```
//!
//! #### Decode to raw bytes.
//!
//! This returns the de-filtered scanlines, without filter bytes, in the
//! image's own layout. Inspect [`PngDecoder::get_info`] to interpret them.
//!
//!```no_run
//! use ember_png::PngDecoder;
//! let mut decoder = PngDecoder::new(&[]);
//!
//! let pixels = decoder.decode_raw();
//! ```
//!
//! # Extracting metadata
//!
//! Once headers have been decoded, image metadata can be accessed via [`get_info()`](PngDecoder::get_info) method
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
//!
#![allow(clippy::op_ref, clippy::identity_op)]

pub use decoder::{PngDecoder, PngInfo};
pub use ember_core;
pub use enums::{InterlaceMethod, PngColor};

mod constants;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod utils;
