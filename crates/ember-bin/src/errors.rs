/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use ember_inflate::errors::InflateDecodeErrors;
use ember_jpeg::errors::DecodeErrors;
use ember_png::error::PngDecodeErrors;

/// Errors that stop the command line tool
pub enum BinErrors {
    Io(std::io::Error),
    Png(PngDecodeErrors),
    Jpeg(DecodeErrors),
    Inflate(InflateDecodeErrors),
    Json(serde_json::Error),
    /// Auto detection failed for the file
    UnknownFormat(PathBuf),
    /// A format was given where only an image makes sense, or the reverse
    FormatMismatch(&'static str)
}

impl Debug for BinErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => writeln!(f, "I/O error: {err}"),
            Self::Png(err) => writeln!(f, "PNG decoding failed ({:?}): {:?}", err.kind(), err),
            Self::Jpeg(err) => writeln!(f, "JPEG decoding failed ({:?}): {:?}", err.kind(), err),
            Self::Inflate(err) => {
                writeln!(f, "Inflate decoding failed ({:?}): {:?}", err.kind(), err)
            }
            Self::Json(err) => writeln!(f, "Could not serialize metadata: {err}"),
            Self::UnknownFormat(path) => writeln!(
                f,
                "Could not determine the format of {path:?}, use --format to set it"
            ),
            Self::FormatMismatch(reason) => writeln!(f, "{reason}")
        }
    }
}

impl Display for BinErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for BinErrors {}

impl From<std::io::Error> for BinErrors {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<PngDecodeErrors> for BinErrors {
    fn from(value: PngDecodeErrors) -> Self {
        Self::Png(value)
    }
}

impl From<DecodeErrors> for BinErrors {
    fn from(value: DecodeErrors) -> Self {
        Self::Jpeg(value)
    }
}

impl From<InflateDecodeErrors> for BinErrors {
    fn from(value: InflateDecodeErrors) -> Self {
        Self::Inflate(value)
    }
}

impl From<serde_json::Error> for BinErrors {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
