/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::options::DecoderOptions;
use ember_inflate::DeflateOptions;

use crate::cmd_parsers::global_options::CmdOptions;

pub mod global_options;

pub fn get_decoder_options(options: &CmdOptions) -> DecoderOptions {
    DecoderOptions::default()
        .set_max_width(options.max_width)
        .set_max_height(options.max_height)
        .set_strict_mode(options.strict_mode)
        .set_confirm_checksums(options.confirm_checksums)
}

pub fn get_deflate_options(options: &CmdOptions) -> DeflateOptions {
    let decoder_options = get_decoder_options(options);

    DeflateOptions::default()
        .set_limit(decoder_options.get_inflate_limit())
        .set_confirm_checksum(decoder_options.get_confirm_checksums())
}
