/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::bytestream::ByteReader;
use ember_core::log::{trace, warn};
use ember_core::options::DecoderOptions;
use ember_core::result::DecodedImage;
use ember_inflate::DeflateOptions;

use crate::constants::PNG_SIGNATURE;
use crate::enums::{is_critical, FilterMethod, InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};

/// A palette entry, `alpha` stays 255 unless a `tRNS` chunk says otherwise
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PLTEEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

#[derive(Copy, Clone)]
pub(crate) struct PngChunk {
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

/// Image information read from the `IHDR` chunk
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct PngInfo {
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub component:        u8,
    pub interlace_method: InterlaceMethod
}

impl PngInfo {
    /// Number of bytes in one de-filtered scanline, without the filter byte
    pub const fn stride(&self) -> usize {
        (self.width * self.component as usize * self.depth as usize + 7) / 8
    }

    /// Byte distance used by the filters, the size of a complete pixel
    /// rounded up to one byte
    pub(crate) const fn filter_distance(&self) -> usize {
        let bytes = (self.component as usize * self.depth as usize) / 8;

        if bytes == 0 {
            1
        } else {
            bytes
        }
    }
}

pub struct PngDecoder<'a> {
    pub(crate) seen_hdr:     bool,
    pub(crate) seen_headers: bool,
    pub(crate) seen_idat:    bool,
    pub(crate) seen_iend:    bool,
    pub(crate) stream:       ByteReader<'a>,
    pub(crate) options:      DecoderOptions,
    pub(crate) png_info:     PngInfo,
    pub(crate) palette:      Vec<PLTEEntry>,
    pub(crate) idat_chunks:  Vec<u8>,
    /// Colour key from `tRNS` for grayscale and RGB images
    pub(crate) trns_key:     Option<[u16; 3]>
}

impl<'a> PngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PngDecoder<'a> {
        let default_opt = DecoderOptions::default();

        PngDecoder::new_with_options(data, default_opt)
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a> {
        PngDecoder {
            seen_hdr: false,
            seen_headers: false,
            seen_idat: false,
            seen_iend: false,
            stream: ByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            palette: Vec::new(),
            idat_chunks: Vec::with_capacity(37), // randomly chosen size, my favourite number,
            trns_key: None
        }
    }

    /// Get image dimensions or none if they aren't decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.seen_hdr {
            return None;
        }

        Some((self.png_info.width, self.png_info.height))
    }

    /// Get image information, or none if headers haven't been decoded
    pub const fn get_info(&self) -> Option<PngInfo> {
        if !self.seen_hdr {
            return None;
        }
        Some(self.png_info)
    }

    fn read_chunk_header(&mut self) -> Result<PngChunk, PngDecodeErrors> {
        // Format is length - chunk type - [data] -  crc chunk
        let chunk_length = self.stream.read_u32_be()? as usize;
        let chunk = self.stream.read_fixed_bytes::<4>()?;

        let chunk_type = PngChunkType::from_bytes(&chunk);

        if !self.stream.has(chunk_length.saturating_add(4) /*crc stream*/) {
            let err = format!(
                "Not enough bytes for chunk {:?}, bytes requested are {}, but bytes present are {}",
                String::from_utf8_lossy(&chunk),
                chunk_length.saturating_add(4),
                self.stream.remaining()
            );

            return Err(PngDecodeErrors::Generic(err));
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk_type,
            chunk
        })
    }

    /// Decode chunks up to the first `IDAT` chunk
    ///
    /// After this, image information can be retrieved via [`get_info`](Self::get_info)
    pub fn decode_headers(&mut self) -> Result<(), PngDecodeErrors> {
        if self.seen_headers {
            return Ok(());
        }
        // READ PNG signature
        let signature = self
            .stream
            .read_u64_be()
            .map_err(|_| PngDecodeErrors::BadSignature)?;

        if signature != PNG_SIGNATURE {
            return Err(PngDecodeErrors::BadSignature);
        }

        // check if first chunk is ihdr here
        if self.stream.peek_at(4, 4)? != b"IHDR" {
            return Err(PngDecodeErrors::GenericStatic(
                "First chunk not IHDR, Corrupt PNG"
            ));
        }
        self.read_chunks(true)?;
        self.seen_headers = true;

        Ok(())
    }

    /// Read chunks until IEND or the end of the stream, or
    /// until the first IDAT if `stop_at_idat` is set
    fn read_chunks(&mut self, stop_at_idat: bool) -> Result<(), PngDecodeErrors> {
        while !self.stream.eof() && !self.seen_iend {
            if stop_at_idat && self.stream.peek_at(4, 4)? == b"IDAT" {
                return Ok(());
            }
            let header = self.read_chunk_header()?;

            trace!(
                "Chunk {}, length {}",
                String::from_utf8_lossy(&header.chunk),
                header.length
            );

            match header.chunk_type {
                PngChunkType::IHDR => self.parse_ihdr(header)?,
                PngChunkType::PLTE => self.parse_plte(header)?,
                PngChunkType::IDAT => self.parse_idat(header)?,
                PngChunkType::tRNS => self.parse_trns(header)?,
                PngChunkType::IEND => {
                    self.stream.skip(header.length + 4)?;
                    self.seen_iend = true;
                    return Ok(());
                }
                PngChunkType::unkn => {
                    if is_critical(header.chunk) {
                        return Err(PngDecodeErrors::UnsupportedStr(format!(
                            "Marker {} unknown but deemed necessary",
                            String::from_utf8_lossy(&header.chunk)
                        )));
                    }
                    trace!("Skipping {} bytes", header.length + 4);
                    self.stream.skip(header.length + 4)?;
                }
            }
        }
        Ok(())
    }

    /// Decode PNG encoded images and return the vector of raw
    /// pixels
    ///
    /// These are the de-filtered scanlines without their filter bytes,
    /// each [`PngInfo::stride`] bytes long, samples in the image's own
    /// depth and colour type.
    pub fn decode_raw(&mut self) -> Result<Vec<u8>, PngDecodeErrors> {
        self.decode_headers()?;

        if self.png_info.interlace_method == InterlaceMethod::Adam7 {
            return Err(PngDecodeErrors::Unsupported(
                "Interlaced (Adam7) images are not supported"
            ));
        }
        self.read_chunks(false)?;

        if !self.seen_idat {
            return Err(PngDecodeErrors::GenericStatic("No IDAT chunks found"));
        }
        if !self.seen_iend {
            if self.options.get_strict_mode() {
                return Err(PngDecodeErrors::GenericStatic("No IEND chunk, corrupt PNG"));
            }
            warn!("No IEND chunk found, image may be truncated");
        }

        // go parse IDAT chunks returning the inflate
        let deflate_data = self.inflate()?;
        // remove idat chunks from memory
        // we are already done with them.
        self.idat_chunks = Vec::new();

        self.create_png_image_raw(&deflate_data)
    }

    /// Decode PNG encoded images and return an RGBA image
    ///
    /// Samples below 8 bits are scaled up, 16 bit samples
    /// keep their most significant byte, palettes are expanded and
    /// transparency from `tRNS` becomes the alpha channel.
    pub fn decode(&mut self) -> Result<DecodedImage, PngDecodeErrors> {
        let raw = self.decode_raw()?;
        let pixels = self.expand_to_rgba(&raw)?;

        Ok(DecodedImage::new(
            self.png_info.width,
            self.png_info.height,
            pixels
        ))
    }

    /// Create the png data from post deflated data
    fn create_png_image_raw(&self, deflate_data: &[u8]) -> Result<Vec<u8>, PngDecodeErrors> {
        let info = &self.png_info;

        let width_stride = info.stride();
        let height = info.height;
        // add filter type
        let chunk_size = width_stride + 1;

        let expected = chunk_size * height;

        if deflate_data.len() < expected {
            let msg = format!(
                "Not enough pixels, expected {} but found {}",
                expected,
                deflate_data.len()
            );
            return Err(PngDecodeErrors::Generic(msg));
        }
        if deflate_data.len() > expected {
            warn!(
                "{} extra bytes after image data, ignoring",
                deflate_data.len() - expected
            );
        }
        let components = info.filter_distance();

        let mut out = vec![0_u8; width_stride * height];

        // each chunk is a width stride of unfiltered data
        let chunks = deflate_data.chunks_exact(chunk_size);

        for (row, in_stride) in chunks.take(height).enumerate() {
            // Split output into current and previous
            // current points to the start of the row where we are writing de-filtered output to
            // prev is all rows we already wrote output to.
            let (prev, current) = out.split_at_mut(row * width_stride);
            let current = &mut current[..width_stride];

            // take filter
            let filter_byte = in_stride[0];
            // raw image bytes
            let raw = &in_stride[1..];

            // get it's type
            let mut filter = FilterMethod::from_int(filter_byte).ok_or_else(|| {
                PngDecodeErrors::Generic(format!("Unknown filter {filter_byte} in row {row}"))
            })?;

            let mut prev_row: &[u8] = &[];

            if row == 0 {
                // match our filters to special filters for first row
                // these special filters do not need the previous scanline and treat it
                // as zero
                filter = match filter {
                    FilterMethod::Paeth => FilterMethod::PaethFirst,
                    // up for the first row becomes a memcpy
                    FilterMethod::Up => FilterMethod::None,
                    FilterMethod::Average => FilterMethod::AvgFirst,
                    other => other
                };
            } else {
                prev_row = &prev[(row - 1) * width_stride..];
            }

            match filter {
                FilterMethod::None => current.copy_from_slice(raw),

                FilterMethod::Average => handle_avg(prev_row, raw, current, components),

                FilterMethod::Sub => handle_sub(raw, current, components),

                FilterMethod::Up => handle_up(prev_row, raw, current),

                FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components),

                FilterMethod::PaethFirst => handle_paeth_first(raw, current, components),

                FilterMethod::AvgFirst => handle_avg_first(raw, current, components)
            }
        }

        Ok(out)
    }

    /// Undo deflate decoding
    fn inflate(&mut self) -> Result<Vec<u8>, PngDecodeErrors> {
        // An annoying thing is that deflate doesn't
        // store its uncompressed size,
        // but we know how big the image should be
        let size_hint = (self.png_info.stride() + 1) * self.png_info.height;

        let option = DeflateOptions::default()
            .set_size_hint(size_hint)
            .set_limit(self.options.get_inflate_limit())
            .set_confirm_checksum(self.options.get_confirm_checksums());

        let mut decoder = ember_inflate::DeflateDecoder::new_with_options(&self.idat_chunks, option);

        decoder
            .decode_zlib()
            .map_err(PngDecodeErrors::ZlibDecodeErrors)
    }
}
