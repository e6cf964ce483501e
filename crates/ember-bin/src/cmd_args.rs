/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};

/// The kind of data held by the input file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum InputFormat {
    /// Guess from the first bytes of the file
    Auto,
    Png,
    Jpeg,
    Zlib,
    Deflate
}

impl InputFormat {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Zlib => "zlib",
            Self::Deflate => "deflate"
        }
    }

    /// Whether decoding produces an image rather than a byte stream
    pub const fn is_image(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

impl ValueEnum for InputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Auto, Self::Png, Self::Jpeg, Self::Zlib, Self::Deflate]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.name()))
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("ember")
        .about("Decode png, jpeg and zlib/deflate files")
        .arg(Arg::new("in")
            .help("Input file to read data from")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Output to write the data to")
            .long_help("Output to write the data to.\nImages are written as PAM (P7) files with an RGB_ALPHA tuple type, zlib and deflate streams are written decompressed")
            .value_parser(value_parser!(PathBuf))
            .required_unless_present("probe"))
        .arg(Arg::new("format")
            .long("format")
            .help("Format of the input file")
            .long_help("Format of the input file.\nWith auto, png and jpeg files are recognised by their signature, anything else is tried as a zlib stream")
            .value_parser(value_parser!(InputFormat))
            .default_value("auto"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print the headers of the input as json and exit"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of an image, larger images are rejected")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of an image, larger images are rejected")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Treat recoverable errors such as truncated data as fatal"))
        .arg(Arg::new("no-checksum")
            .long("no-checksum")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Do not verify zlib checksums"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}
