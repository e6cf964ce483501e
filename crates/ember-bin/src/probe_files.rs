/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::ArgMatches;
use ember_jpeg::JpegDecoder;
use ember_png::PngDecoder;

use crate::cmd_args::InputFormat;
use crate::cmd_parsers::get_decoder_options;
use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::BinErrors;
use crate::file_io::read_input;
use crate::serde::{Details, Metadata};
use crate::workflow::resolve_format;

/// Probe the input file, extract metadata, and print to standard output.
pub fn probe_input_file(args: &ArgMatches, cmd_opts: &CmdOptions) -> Result<(), BinErrors> {
    let Some(in_file) = args.get_one::<PathBuf>("in") else {
        return Ok(());
    };
    let data = read_input(in_file)?;
    let format = resolve_format(in_file, &data, cmd_opts.format)?;

    // set to high to remove restrictions.
    // We'll just be reading headers so it doesn't matter
    let options = get_decoder_options(cmd_opts)
        .set_max_width(usize::MAX)
        .set_max_height(usize::MAX);

    let details = match format {
        InputFormat::Png => {
            let mut decoder = PngDecoder::new_with_options(&data, options);
            decoder.decode_headers()?;
            decoder.get_info().map_or(Details::Stream, Details::Png)
        }
        InputFormat::Jpeg => {
            let mut decoder = JpegDecoder::new_with_options(&data, options);
            decoder.decode_headers()?;
            decoder.info().map_or(Details::Stream, Details::Jpeg)
        }
        _ => Details::Stream
    };
    let metadata = Metadata::new(in_file, data.len(), format.name(), details);

    println!("{}", serde_json::to_string_pretty(&metadata)?);

    Ok(())
}
