/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use ember_jpeg::ImageInfo;
use ember_png::PngInfo;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Format specific header fields
pub enum Details {
    Png(PngInfo),
    Jpeg(ImageInfo),
    /// zlib or deflate data, nothing is known before decoding
    Stream
}

pub struct Metadata<'a> {
    file:    &'a Path,
    size:    usize,
    format:  &'static str,
    details: Details
}

impl<'a> Metadata<'a> {
    pub fn new(file: &'a Path, size: usize, format: &'static str, details: Details) -> Metadata<'a> {
        Metadata {
            file,
            size,
            format,
            details
        }
    }
}

impl<'a> Serialize for Metadata<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageMetadata", 9)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("format", self.format)?;

        match &self.details {
            Details::Png(info) => {
                state.serialize_field("width", &info.width)?;
                state.serialize_field("height", &info.height)?;
                state.serialize_field("depth", &info.depth)?;
                state.serialize_field("color", &format!("{:?}", info.color))?;
                state.serialize_field("interlace", &format!("{:?}", info.interlace_method))?;
            }
            Details::Jpeg(info) => {
                state.serialize_field("width", &info.width)?;
                state.serialize_field("height", &info.height)?;
                state.serialize_field("components", &info.components)?;
                state.serialize_field("sof", &format!("{:?}", info.sof))?;
                state.serialize_field("restart_interval", &info.restart_interval)?;
                state.serialize_field("density", &[info.x_density, info.y_density])?;
            }
            Details::Stream => {}
        }

        state.end()
    }
}
