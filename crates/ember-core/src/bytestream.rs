/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! with endian aware reads.
//!
//! All reads are bounds checked, a read which cannot be satisfied
//! returns an error and leaves the position untouched.
pub use reader::{ByteIoError, ByteReader, Endian};

mod reader;
