/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The `ember` command line tool
//!
//! Decodes a png, jpeg, zlib or raw deflate file. Images are written
//! out as 8 bit RGBA PAM files, compressed streams as their raw bytes.
use std::process::exit;

use log::error;

use crate::probe_files::probe_input_file;
use crate::workflow::decode_from_cmd;

mod cmd_args;
mod cmd_parsers;
mod errors;
mod file_io;
mod probe_files;
mod serde;
mod workflow;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    cmd_parsers::global_options::setup_logger(&options);

    let parsed_opts = cmd_parsers::global_options::parse_options(&options);

    let result = if parsed_opts.probe {
        probe_input_file(&options, &parsed_opts)
    } else {
        decode_from_cmd(&options, &parsed_opts)
    };

    if let Err(reason) = result {
        println!();
        error!(" Could not complete workflow, reason {:?}", reason);
        println!();
        exit(-1);
    }
}
