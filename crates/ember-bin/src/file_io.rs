/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use ember_core::result::DecodedImage;
use log::{debug, info};

use crate::errors::BinErrors;

pub fn read_input(path: &Path) -> Result<Vec<u8>, BinErrors> {
    let mut fd = File::open(path)?;
    let mut buf = Vec::with_capacity(1 << 20);

    info!("Reading {:?} to memory", path);
    fd.read_to_end(&mut buf)?;
    debug!("Read {} bytes", buf.len());

    Ok(buf)
}

fn create_output(path: &Path) -> Result<BufWriter<File>, BinErrors> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)?;

    Ok(BufWriter::new(file))
}

/// Write an RGBA image as a PAM file
pub fn write_pam<W: Write>(writer: &mut W, image: &DecodedImage) -> Result<(), BinErrors> {
    write!(
        writer,
        "P7\nWIDTH {}\nHEIGHT {}\nDEPTH {}\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        image.width,
        image.height,
        DecodedImage::COMPONENTS
    )?;
    writer.write_all(&image.data)?;

    Ok(())
}

pub fn write_image(path: &Path, image: &DecodedImage) -> Result<(), BinErrors> {
    debug!("Writing {:?} as a pam file", path);

    let mut writer = create_output(path)?;
    write_pam(&mut writer, image)?;
    writer.flush()?;

    Ok(())
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), BinErrors> {
    debug!("Writing {} bytes to {:?}", bytes.len(), path);

    let mut writer = create_output(path)?;
    writer.write_all(bytes)?;
    writer.flush()?;

    Ok(())
}
