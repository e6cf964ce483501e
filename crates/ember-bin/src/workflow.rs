/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::ArgMatches;
use ember_core::result::DecodedImage;
use ember_inflate::DeflateDecoder;
use ember_jpeg::JpegDecoder;
use ember_png::PngDecoder;
use log::{debug, info, warn};

use crate::cmd_args::InputFormat;
use crate::cmd_parsers::global_options::CmdOptions;
use crate::cmd_parsers::{get_decoder_options, get_deflate_options};
use crate::errors::BinErrors;
use crate::file_io::{read_input, write_bytes, write_image};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Guess the format of `data` from its first bytes
///
/// Raw deflate has no signature, it is only chosen when asked for.
pub(crate) fn guess_format(data: &[u8]) -> Option<InputFormat> {
    if data.starts_with(&PNG_MAGIC) {
        return Some(InputFormat::Png);
    }
    if data.starts_with(&JPEG_MAGIC) {
        return Some(InputFormat::Jpeg);
    }
    if let [cmf, flg, ..] = data {
        let header = u16::from_be_bytes([*cmf, *flg]);

        if cmf & 0x0F == 8 && cmf >> 4 <= 7 && header % 31 == 0 {
            return Some(InputFormat::Zlib);
        }
    }
    None
}

/// The format to decode `data` as, auto detecting it if needed
pub(crate) fn resolve_format(
    path: &Path, data: &[u8], requested: InputFormat
) -> Result<InputFormat, BinErrors> {
    if requested != InputFormat::Auto {
        if let Some(guessed) = guess_format(data) {
            if guessed != requested {
                warn!(
                    "{:?} looks like {} data but was requested to be decoded as {}",
                    path,
                    guessed.name(),
                    requested.name()
                );
            }
        }
        return Ok(requested);
    }
    guess_format(data).ok_or_else(|| BinErrors::UnknownFormat(path.to_path_buf()))
}

fn decode_image(
    data: &[u8], format: InputFormat, cmd_opts: &CmdOptions
) -> Result<DecodedImage, BinErrors> {
    let options = get_decoder_options(cmd_opts);

    let image = match format {
        InputFormat::Png => PngDecoder::new_with_options(data, options).decode()?,
        InputFormat::Jpeg => JpegDecoder::new_with_options(data, options).decode()?,
        _ => return Err(BinErrors::FormatMismatch("Not an image format"))
    };
    Ok(image)
}

fn decode_stream(
    data: &[u8], format: InputFormat, cmd_opts: &CmdOptions
) -> Result<Vec<u8>, BinErrors> {
    let mut decoder = DeflateDecoder::new_with_options(data, get_deflate_options(cmd_opts));

    let bytes = match format {
        InputFormat::Zlib => decoder.decode_zlib()?,
        InputFormat::Deflate => decoder.decode_deflate()?,
        _ => return Err(BinErrors::FormatMismatch("Not a compressed stream format"))
    };
    Ok(bytes)
}

pub(crate) fn decode_from_cmd(args: &ArgMatches, cmd_opts: &CmdOptions) -> Result<(), BinErrors> {
    info!("Creating workflows from input");

    let (Some(in_file), Some(out_file)) = (
        args.get_one::<PathBuf>("in"),
        args.get_one::<PathBuf>("out")
    ) else {
        return Err(BinErrors::FormatMismatch("Both an input and an output file are needed"));
    };

    let data = read_input(in_file)?;
    let format = resolve_format(in_file, &data, cmd_opts.format)?;

    debug!("Treating {:?} as a {} file", in_file, format.name());

    let start = Instant::now();

    if format.is_image() {
        let image = decode_image(&data, format, cmd_opts)?;

        info!(
            "Decoded {}x{} image in {} ms",
            image.width,
            image.height,
            start.elapsed().as_millis()
        );
        write_image(out_file, &image)?;
    } else {
        let bytes = decode_stream(&data, format, cmd_opts)?;

        info!(
            "Inflated {} bytes to {} bytes in {} ms",
            data.len(),
            bytes.len(),
            start.elapsed().as_millis()
        );
        write_bytes(out_file, &bytes)?;
    }
    Ok(())
}
