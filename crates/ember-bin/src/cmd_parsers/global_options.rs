/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};

use crate::cmd_args::InputFormat;

#[derive(Debug, Copy, Clone)]
pub struct CmdOptions {
    pub format:            InputFormat,
    pub max_width:         usize,
    pub max_height:        usize,
    pub strict_mode:       bool,
    pub confirm_checksums: bool,
    pub probe:             bool
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            format:            InputFormat::Auto,
            max_width:         1 << 14,
            max_height:        1 << 14,
            strict_mode:       false,
            confirm_checksums: true,
            probe:             false
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    let mut cmd_options = CmdOptions::new();

    if let Some(format) = options.get_one::<InputFormat>("format") {
        cmd_options.format = *format;
    }
    if let Some(width) = options.get_one::<usize>("max-width") {
        cmd_options.max_width = *width;
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        cmd_options.max_height = *height;
    }
    if options.get_flag("strict") {
        info!("Strict mode enabled");
        cmd_options.strict_mode = true;
    }
    if options.get_flag("no-checksum") {
        info!("Skipping checksum verification");
        cmd_options.confirm_checksums = false;
    }
    cmd_options.probe = options.get_flag("probe");

    cmd_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
