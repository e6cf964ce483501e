/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Main image logic.
#![allow(clippy::doc_markdown)]

use ember_core::bytestream::ByteReader;
use ember_core::huffman::HuffmanTree;
use ember_core::log::{info, trace, warn};
use ember_core::options::DecoderOptions;
use ember_core::result::DecodedImage;

use crate::components::Components;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::headers::{
    parse_app0, parse_app14, parse_dqt, parse_dri, parse_huffman, parse_sos, parse_start_of_frame
};
use crate::marker::Marker;
use crate::mcu::ScanEnd;
use crate::misc::SOFMarkers;

/// Maximum components
pub(crate) const MAX_COMPONENTS: usize = 4;

/// A JPEG Decoder Instance.
#[allow(clippy::upper_case_acronyms)]
pub struct JpegDecoder<'a> {
    /// Struct to hold image information from SOI
    pub(crate) info:              ImageInfo,
    /// Quantization tables in natural order
    pub(crate) qt_tables:         [Option<[u16; 64]>; MAX_COMPONENTS],
    /// DC Huffman Tables with a maximum of 4 tables for each  component
    pub(crate) dc_huffman_tables: [Option<HuffmanTree>; MAX_COMPONENTS],
    /// AC Huffman Tables with a maximum of 4 tables for each component
    pub(crate) ac_huffman_tables: [Option<HuffmanTree>; MAX_COMPONENTS],
    /// Image components, holds information like DC prediction and quantization
    /// tables of a component
    pub(crate) components:        Vec<Components>,
    /// maximum horizontal component of all channels in the image
    pub(crate) h_max:             usize,
    // maximum vertical component of all channels in the image
    pub(crate) v_max:             usize,
    /// Number of MCU's in the x plane
    pub(crate) mcu_x:             usize,
    /// Number of MCU's in the y plane
    pub(crate) mcu_y:             usize,
    /// Is the image progressive?
    pub(crate) is_progressive:    bool,
    /// Start of spectral scan
    pub(crate) spec_start:        u8,
    /// End of spectral scan
    pub(crate) spec_end:          u8,
    /// Successive approximation bit position high
    pub(crate) succ_high:         u8,
    /// Successive approximation bit position low
    pub(crate) succ_low:          u8,
    /// Number of components in the current scan
    pub(crate) num_scans:         u8,
    /// Positions in `components` of the current scan's components
    pub(crate) z_order:           [usize; MAX_COMPONENTS],
    /// restart markers
    pub(crate) restart_interval:  usize,
    /// Transform flag from an Adobe APP14 segment
    pub(crate) adobe_transform:   Option<u8>,
    // decoder options
    pub(crate) options:           DecoderOptions,
    // byte-stream
    pub(crate) stream:            ByteReader<'a>,
    pub(crate) seen_sof:          bool,
    // Indicate whether headers have been decoded
    pub(crate) headers_decoded:   bool
}

impl<'a> JpegDecoder<'a> {
    fn default(options: DecoderOptions, buffer: &'a [u8]) -> Self {
        JpegDecoder {
            info: ImageInfo::default(),
            qt_tables: [None, None, None, None],
            dc_huffman_tables: [None, None, None, None],
            ac_huffman_tables: [None, None, None, None],
            components: vec![],
            h_max: 1,
            v_max: 1,
            mcu_x: 0,
            mcu_y: 0,
            is_progressive: false,
            spec_start: 0,
            spec_end: 0,
            succ_high: 0,
            succ_low: 0,
            num_scans: 0,
            z_order: [0; MAX_COMPONENTS],
            restart_interval: 0,
            adobe_transform: None,
            options,
            stream: ByteReader::new(buffer),
            seen_sof: false,
            headers_decoded: false
        }
    }

    /// Create a new Decoder instance
    #[must_use]
    pub fn new(stream: &'a [u8]) -> JpegDecoder<'a> {
        JpegDecoder::default(DecoderOptions::default(), stream)
    }

    /// Create a new decoder with the specified options to be used for decoding
    /// an image
    #[must_use]
    pub fn new_with_options(stream: &'a [u8], options: DecoderOptions) -> JpegDecoder<'a> {
        JpegDecoder::default(options, stream)
    }

    /// Decode a buffer already in memory
    ///
    /// The buffer should be a valid jpeg file, perhaps created by the command
    /// `std:::fs::read()` or a JPEG file downloaded from the internet.
    ///
    /// The image is returned as 8 bit RGBA, grayscale images have their
    /// luma replicated to the three colour channels.
    ///
    /// # Errors
    /// See DecodeErrors for an explanation
    pub fn decode(&mut self) -> Result<DecodedImage, DecodeErrors> {
        self.decode_headers()?;
        self.setup_components()?;

        loop {
            match self.decode_scan()? {
                ScanEnd::Marker(code) => match self.parse_markers(Some(code))? {
                    Some(Marker::SOS) => continue,
                    Some(_) => break,
                    None => {
                        warn!("No EOI marker, image may be truncated");
                        break;
                    }
                },
                ScanEnd::EndOfInput => {
                    warn!("No EOI marker, image may be truncated");
                    break;
                }
                ScanEnd::Truncated => break
            }
        }
        trace!("Finished decoding image");

        Ok(self.post_process())
    }

    /// Returns the image information
    ///
    /// This **must** be called after a subsequent call to `decode` or
    /// `decode_headers` otherwise it will return None
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        if !self.headers_decoded {
            return None;
        }
        Some(self.info.clone())
    }

    /// Read only headers from a jpeg image buffer
    ///
    /// This allows you to extract important information like
    /// image width and height without decoding the full image.
    /// Headers are read up to and including the first start of scan.
    ///
    /// # Examples
    /// ```no_run
    /// use ember_jpeg::JpegDecoder;
    ///
    /// let img_data = std::fs::read("a_valid.jpeg").unwrap();
    /// let mut decoder = JpegDecoder::new(&img_data);
    /// decoder.decode_headers().unwrap();
    ///
    /// println!("Total decoder dimensions are : {} pixels",usize::from(decoder.width()) * usize::from(decoder.height()));
    /// println!("Number of components in the image are {}", decoder.info().unwrap().components);
    /// ```
    /// # Errors
    /// See DecodeErrors enum for list of possible errors during decoding
    pub fn decode_headers(&mut self) -> Result<(), DecodeErrors> {
        if self.headers_decoded {
            trace!("Headers decoded!");
            return Ok(());
        }
        // First two bytes should be jpeg soi marker
        let magic_bytes = self.stream.read_u16_be()?;

        if magic_bytes != 0xffd8 {
            return Err(DecodeErrors::IllegalMagicBytes(magic_bytes));
        }

        match self.parse_markers(None)? {
            Some(Marker::SOS) => {
                self.headers_decoded = true;
                Ok(())
            }
            Some(_) => Err(DecodeErrors::FormatStatic("Premature End of image")),
            None => Err(DecodeErrors::FormatStatic(
                "No start of scan found before the end of the image"
            ))
        }
    }

    /// Find the next marker and return the byte following its `0xFF`,
    /// `None` at the end of the input.
    ///
    /// Bytes that are not part of a marker are skipped with a warning,
    /// or are an error in strict mode.
    fn next_marker(&mut self) -> Result<Option<u8>, DecodeErrors> {
        let mut bytes_before_marker = 0;

        loop {
            let Ok(byte) = self.stream.read_u8() else {
                return Ok(None);
            };
            if byte != 0xFF {
                bytes_before_marker += 1;
                continue;
            }
            let mut code = 0xFF;

            while code == 0xFF {
                let Ok(next) = self.stream.read_u8() else {
                    return Ok(None);
                };
                code = next;
            }
            if code == 0x00 {
                bytes_before_marker += 2;
                continue;
            }
            if bytes_before_marker > 0 {
                if self.options.get_strict_mode() {
                    return Err(DecodeErrors::FormatStatic(
                        "[strict-mode]: Extra bytes between headers"
                    ));
                }
                warn!(
                    "Extra bytes {} before marker 0xFF{:X}",
                    bytes_before_marker, code
                );
            }
            return Ok(Some(code));
        }
    }

    /// Parse marker segments until a start of scan or end of image.
    ///
    /// `pending` is a marker already read from the stream, e.g the one
    /// that ended a scan. Returns the marker that stopped parsing,
    /// `Marker::SOS` after its header has been read, or `None` if the
    /// input ran out.
    pub(crate) fn parse_markers(
        &mut self, mut pending: Option<u8>
    ) -> Result<Option<Marker>, DecodeErrors> {
        loop {
            let code = match pending.take() {
                Some(code) => code,
                None => match self.next_marker()? {
                    Some(code) => code,
                    None => return Ok(None)
                }
            };
            let Some(marker) = Marker::from_u8(code) else {
                warn!("Marker 0xFF{:X} not known", code);
                self.skip_segment()?;
                continue;
            };
            trace!("Found marker {:?}", marker);

            match marker {
                Marker::SOF(0..=2) => {
                    let sof = match marker {
                        Marker::SOF(0) => SOFMarkers::BaselineDct,
                        Marker::SOF(1) => SOFMarkers::ExtendedSequentialHuffman,
                        _ => SOFMarkers::ProgressiveDctHuffman
                    };
                    info!("Image encoding scheme =`{:?}`", sof);
                    parse_start_of_frame(sof, self)?;
                }
                // Start of Frame Segments not supported
                Marker::SOF(v) => {
                    if let Some(feature) = UnsupportedSchemes::from_int(0xC0 + v) {
                        return Err(DecodeErrors::Unsupported(feature));
                    }
                    return Err(DecodeErrors::Format(format!(
                        "Unknown start of frame marker 0xFF{:X}",
                        0xC0 + v
                    )));
                }
                Marker::DQT => parse_dqt(self)?,
                Marker::DHT => parse_huffman(self)?,
                Marker::DRI => parse_dri(self)?,
                Marker::APP(0) => parse_app0(self)?,
                Marker::APP(14) => parse_app14(self)?,
                Marker::APP(_) | Marker::COM => self.skip_segment()?,
                Marker::SOS => {
                    parse_sos(self)?;
                    return Ok(Some(Marker::SOS));
                }
                Marker::EOI => return Ok(Some(Marker::EOI)),
                Marker::RST(n) => {
                    // stand alone markers, nothing to skip
                    warn!("Stray restart marker RST{} outside of a scan", n);
                }
                Marker::SOI => {
                    return Err(DecodeErrors::FormatStatic(
                        "Start of image marker inside the image"
                    ));
                }
                Marker::DAC => {
                    return Err(DecodeErrors::UnsupportedFeature(
                        "Arithmetic coding conditioning (DAC)"
                    ));
                }
                Marker::DNL => {
                    return Err(DecodeErrors::UnsupportedFeature(
                        "Image height defined by a DNL marker"
                    ));
                }
            }
        }
    }

    /// Skip a segment using its length field
    fn skip_segment(&mut self) -> Result<(), DecodeErrors> {
        let length = self.stream.read_u16_be()?;

        if length < 2 {
            return Err(DecodeErrors::Format(format!(
                "Found a marker with invalid length : {length}"
            )));
        }
        trace!("Skipping {} bytes", length - 2);
        self.stream.skip(usize::from(length - 2))?;

        Ok(())
    }

    /// Check the frame can be decoded and size every component
    pub(crate) fn setup_components(&mut self) -> Result<(), DecodeErrors> {
        if !matches!(self.components.len(), 1 | 3) {
            return Err(DecodeErrors::UnsupportedFeature(
                "Only images with one (grayscale) or three (YCbCr/RGB) components are supported"
            ));
        }
        self.h_max = self
            .components
            .iter()
            .map(|c| c.horizontal_sample)
            .max()
            .unwrap_or(1);
        self.v_max = self
            .components
            .iter()
            .map(|c| c.vertical_sample)
            .max()
            .unwrap_or(1);

        for comp in &self.components {
            if self.h_max % comp.horizontal_sample != 0 || self.v_max % comp.vertical_sample != 0 {
                return Err(DecodeErrors::UnsupportedFeature(
                    "Sampling factors that do not divide the largest sampling factor"
                ));
            }
        }
        let width = usize::from(self.info.width);
        let height = usize::from(self.info.height);

        self.mcu_x = (width + self.h_max * 8 - 1) / (self.h_max * 8);
        self.mcu_y = (height + self.v_max * 8 - 1) / (self.v_max * 8);

        for comp in &mut self.components {
            comp.setup(width, height, self.h_max, self.v_max, self.mcu_x, self.mcu_y);
        }
        info!(
            "Sampling factors ({},{}), MCU grid {}x{}",
            self.h_max, self.v_max, self.mcu_x, self.mcu_y
        );
        Ok(())
    }

    /// Get the width of the image as a u16
    ///
    /// The width lies between 0 and 65535
    #[must_use]
    pub fn width(&self) -> u16 {
        self.info.width
    }

    /// Get the height of the image as a u16
    ///
    /// The height lies between 0 and 65535
    #[must_use]
    pub fn height(&self) -> u16 {
        self.info.height
    }
}

/// A struct representing Image Information
#[derive(Default, Clone, Debug, Eq, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct ImageInfo {
    /// Width of the image
    pub width:            u16,
    /// Height of image
    pub height:           u16,
    /// Sample precision in bits
    pub pixel_density:    u8,
    /// Start of frame markers
    pub sof:              SOFMarkers,
    /// Horizontal pixel density from a JFIF header
    pub x_density:        u16,
    /// Vertical pixel density from a JFIF header
    pub y_density:        u16,
    /// Number of components
    pub components:       u8,
    /// MCUs between restart markers, zero if the image has none
    pub restart_interval: u16
}
