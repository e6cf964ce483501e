/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode Decoder markers/segments
//!
//! This file deals with decoding header information in a jpeg file
//!
use ember_core::huffman::HuffmanTree;
use ember_core::log::{info, trace, warn};

use crate::components::Components;
use crate::decoder::{JpegDecoder, MAX_COMPONENTS};
use crate::errors::DecodeErrors;
use crate::misc::{SOFMarkers, UN_ZIGZAG};

///**B.2.4.2 Huffman table-specification syntax**
#[allow(clippy::similar_names, clippy::cast_sign_loss)]
pub(crate) fn parse_huffman(decoder: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    // Read the length of the Huffman table
    let mut dht_length = i32::from(
        decoder
            .stream
            .read_u16_be()?
            .checked_sub(2)
            .ok_or(DecodeErrors::FormatStatic("Invalid Huffman length in image"))?
    );

    while dht_length > 16 {
        // HT information
        let ht_info = decoder.stream.read_u8()?;
        // third bit indicates whether the huffman encoding is DC or AC type
        let dc_or_ac = (ht_info >> 4) & 0xF;
        // Indicate the position of this table, should be less than 4;
        let index = (ht_info & 0xF) as usize;

        if index >= MAX_COMPONENTS {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT index {index}, expected between 0 and 3"
            )));
        }

        if dc_or_ac > 1 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT position {dc_or_ac}, should be 0 or 1"
            )));
        }
        // number of codes of each length
        let num_symbols: [u8; 16] = decoder.stream.read_fixed_bytes()?;

        dht_length -= 1 + 16;

        let symbols_sum: i32 = num_symbols.iter().map(|f| i32::from(*f)).sum();

        // The sum of the number of symbols cannot be greater than 256;
        if symbols_sum > 256 {
            return Err(DecodeErrors::FormatStatic(
                "Encountered Huffman table with excessive length in DHT"
            ));
        }
        if symbols_sum > dht_length {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Excessive Huffman table of length {symbols_sum} found when header length is {dht_length}"
            )));
        }
        dht_length -= symbols_sum;
        // A table containing symbols in increasing code length
        let symbols = decoder.stream.get_as_ref(symbols_sum as usize)?;

        let table = HuffmanTree::from_jpeg_counts(&num_symbols, symbols)?;

        trace!(
            "Assigning {} huffman table {index} with {symbols_sum} codes",
            if dc_or_ac == 0 { "DC" } else { "AC" }
        );
        // store
        match dc_or_ac {
            0 => decoder.dc_huffman_tables[index] = Some(table),
            _ => decoder.ac_huffman_tables[index] = Some(table)
        }
    }

    if dht_length > 0 {
        return Err(DecodeErrors::FormatStatic("Bogus Huffman table definition"));
    }

    Ok(())
}

///**B.2.4.1 Quantization table-specification syntax**
pub(crate) fn parse_dqt(img: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    // read length
    let mut qt_length =
        img.stream
            .read_u16_be()?
            .checked_sub(2)
            .ok_or(DecodeErrors::FormatStatic(
                "Invalid DQT length. Length should be greater than 2"
            ))?;
    // A single DQT header may have multiple QT's
    while qt_length > 0 {
        let qt_info = img.stream.read_u8()?;
        // 0 = 8 bit otherwise 16 bit dqt
        let precision = qt_info >> 4;
        // last 4 bits give us position
        let table_position = usize::from(qt_info & 0x0f);

        match precision {
            0 => (),
            1 => {
                return Err(DecodeErrors::UnsupportedFeature(
                    "16 bit quantization tables"
                ))
            }
            _ => {
                return Err(DecodeErrors::DqtError(format!(
                    "Expected QT precision value of either 0 or 1, found {precision:?}"
                )));
            }
        }

        if table_position >= MAX_COMPONENTS {
            return Err(DecodeErrors::DqtError(format!(
                "Too large table position for QT :{table_position}, expected between 0 and 3"
            )));
        }

        if qt_length < 65 {
            return Err(DecodeErrors::DqtError(format!("Invalid QT table bytes left :{qt_length}. Too small to construct a valid qt table which should be 65 long")));
        }
        let qt_values: [u8; 64] = img.stream.read_fixed_bytes()?;

        qt_length -= 64 + 1 /*QT BIT*/;

        trace!("Assigning qt table {table_position} with precision {precision}");
        // carry out un zig-zag here
        img.qt_tables[table_position] = Some(un_zig_zag(&qt_values));
    }

    Ok(())
}

/// Section:`B.2.2 Frame header syntax`
pub(crate) fn parse_start_of_frame(
    sof: SOFMarkers, img: &mut JpegDecoder
) -> Result<(), DecodeErrors> {
    if img.seen_sof {
        return Err(DecodeErrors::SofError(
            "Two Start of Frame Markers".to_string()
        ));
    }
    // Get length of the frame header
    let length = img.stream.read_u16_be()?;
    // usually 8, but can be 12 and 16, we currently support only 8
    let dt_precision = img.stream.read_u8()?;

    match dt_precision {
        8 => (),
        12 => return Err(DecodeErrors::UnsupportedFeature("12 bit sample precision")),
        _ => {
            return Err(DecodeErrors::SofError(format!(
                "Invalid sample precision {dt_precision}, expected 8 or 12"
            )))
        }
    }

    img.info.pixel_density = dt_precision;

    // read  and set the image height.
    let img_height = img.stream.read_u16_be()?;
    // read and set the image width
    let img_width = img.stream.read_u16_be()?;

    trace!("Image width  :{}", img_width);
    trace!("Image height :{}", img_height);

    // Check image width or height is zero
    if img_width == 0 || img_height == 0 {
        return Err(DecodeErrors::ZeroError);
    }

    if usize::from(img_width) > img.options.get_max_width() {
        return Err(DecodeErrors::Format(format!(
            "Image width {} greater than width limit {}",
            img_width,
            img.options.get_max_width()
        )));
    }

    if usize::from(img_height) > img.options.get_max_height() {
        return Err(DecodeErrors::Format(format!(
            "Image height {} greater than height limit {}",
            img_height,
            img.options.get_max_height()
        )));
    }

    // Number of components for the image.
    let num_components = img.stream.read_u8()?;

    if num_components == 0 {
        return Err(DecodeErrors::SofError(
            "Number of components cannot be zero.".to_string()
        ));
    }

    let expected = 8 + 3 * u16::from(num_components);
    // length should be equal to num components
    if length != expected {
        return Err(DecodeErrors::SofError(format!(
            "Length of start of frame differs from expected {expected},value is {length}"
        )));
    }

    let mut components: Vec<Components> = Vec::with_capacity(usize::from(num_components));

    for pos in 0..usize::from(num_components) {
        // read 3 bytes for each component
        let temp: [u8; 3] = img.stream.read_fixed_bytes()?;

        let component = Components::from(temp, pos)?;

        if components.iter().any(|c| c.id == component.id) {
            return Err(DecodeErrors::SofError(format!(
                "Duplicate component id {} in start of frame",
                component.id
            )));
        }
        trace!(
            "Component {}: sampling ({},{}), quantization table {}",
            component.id,
            component.horizontal_sample,
            component.vertical_sample,
            component.quantization_table_number
        );
        components.push(component);
    }
    info!(
        "Image dimensions {}x{}, {} component(s)",
        img_width, img_height, num_components
    );

    img.info.width = img_width;
    img.info.height = img_height;
    img.info.components = num_components;
    img.info.sof = sof;
    img.is_progressive = sof.is_progressive();
    img.components = components;
    img.seen_sof = true;

    Ok(())
}

/// Parse a start of scan data
pub(crate) fn parse_sos(image: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    if !image.seen_sof {
        return Err(DecodeErrors::FormatStatic(
            "Start of scan found before start of frame"
        ));
    }
    // Scan header length
    let ls = usize::from(image.stream.read_u16_be()?);
    // Number of image components in scan
    let ns = image.stream.read_u8()?;

    let smallest_size = 6 + 2 * usize::from(ns);

    if ls != smallest_size {
        return Err(DecodeErrors::SosError(format!(
            "Bad SOS length {ls},corrupt jpeg"
        )));
    }

    // Check number of components.
    if !(1..=4).contains(&ns) {
        return Err(DecodeErrors::SosError(format!(
            "Invalid number of components in start of scan {ns}, expected in range 1..=4"
        )));
    }

    let mut seen = [None; MAX_COMPONENTS];

    for i in 0..usize::from(ns) {
        let id = image.stream.read_u8()?;

        if seen.contains(&Some(id)) {
            return Err(DecodeErrors::SosError(format!(
                "Duplicate ID {id} seen twice in the same component"
            )));
        }
        seen[i] = Some(id);
        // DC and AC huffman table position
        // top 4 bits contain dc huffman destination table
        // lower four bits contain ac huffman destination table
        let y = image.stream.read_u8()?;

        let Some(position) = image.components.iter().position(|c| c.id == id) else {
            return Err(DecodeErrors::SosError(format!(
                "Invalid component id {}, expected one one of {:?}",
                id,
                image.components.iter().map(|c| c.id).collect::<Vec<_>>()
            )));
        };
        let dc_table = usize::from(y >> 4);
        let ac_table = usize::from(y & 0xF);

        if dc_table >= MAX_COMPONENTS || ac_table >= MAX_COMPONENTS {
            return Err(DecodeErrors::SosError(format!(
                "Invalid huffman table ids {dc_table}/{ac_table} for component {id}, expected values between 0 and 3"
            )));
        }

        let component = &mut image.components[position];
        component.dc_huff_table = dc_table;
        component.ac_huff_table = ac_table;
        image.z_order[i] = position;

        trace!(
            "Assigned huffman tables {}/{} to component {}",
            dc_table,
            ac_table,
            id
        );
    }
    image.num_scans = ns;

    // Start of spectral / predictor selection. (between 0 and 63)
    image.spec_start = image.stream.read_u8()?;
    // End of spectral selection
    image.spec_end = image.stream.read_u8()?;

    let bit_approx = image.stream.read_u8()?;
    // successive approximation bit position high
    image.succ_high = bit_approx >> 4;
    // successive approximation bit position low
    image.succ_low = bit_approx & 0xF;

    if image.spec_end > 63 {
        return Err(DecodeErrors::SosError(format!(
            "Invalid Se parameter {}, range should be 0-63",
            image.spec_end
        )));
    }
    if image.spec_start > 63 {
        return Err(DecodeErrors::SosError(format!(
            "Invalid Ss parameter {}, range should be 0-63",
            image.spec_start
        )));
    }
    if image.succ_high > 13 {
        return Err(DecodeErrors::SosError(format!(
            "Invalid Ah parameter {}, range should be 0-13",
            image.succ_high
        )));
    }
    if image.succ_low > 13 {
        return Err(DecodeErrors::SosError(format!(
            "Invalid Al parameter {}, range should be 0-13",
            image.succ_low
        )));
    }

    trace!(
        "Ss={}, Se={} Ah={} Al={}",
        image.spec_start,
        image.spec_end,
        image.succ_high,
        image.succ_low
    );

    Ok(())
}

/// Section `B.2.4.4 Restart interval definition syntax`
pub(crate) fn parse_dri(decoder: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    if decoder.stream.read_u16_be()? != 4 {
        return Err(DecodeErrors::FormatStatic("Bad DRI length, Corrupt JPEG"));
    }
    let interval = decoder.stream.read_u16_be()?;

    info!("DRI marker present, restart interval {}", interval);

    decoder.restart_interval = usize::from(interval);
    decoder.info.restart_interval = interval;

    Ok(())
}

/// Parse the APP0 segment, reading pixel densities of a JFIF header
pub(crate) fn parse_app0(decoder: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    let mut length = usize::from(decoder.stream.read_u16_be()?);

    if length < 2 {
        return Err(DecodeErrors::FormatStatic("Too small APP0 length"));
    }
    length -= 2;

    if length >= 14 && decoder.stream.peek_at(0, 5)? == b"JFIF\0" {
        // identifier and version
        decoder.stream.skip(7)?;
        let units = decoder.stream.read_u8()?;
        decoder.info.x_density = decoder.stream.read_u16_be()?;
        decoder.info.y_density = decoder.stream.read_u16_be()?;

        trace!(
            "JFIF header, density {}x{} (units {})",
            decoder.info.x_density,
            decoder.info.y_density,
            units
        );
        length -= 12;
    }
    decoder.stream.skip(length)?;

    Ok(())
}

/// Parse Adobe App14 segment
pub(crate) fn parse_app14(decoder: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    // skip length
    let mut length = usize::from(decoder.stream.read_u16_be()?);

    if length < 2 {
        return Err(DecodeErrors::FormatStatic("Too small APP14 length"));
    }
    length -= 2;

    if length >= 12 && decoder.stream.peek_at(0, 5)? == b"Adobe" {
        // skip adobe id, version, flags0 and flags1
        decoder.stream.skip(11)?;
        // get color transform
        let transform = decoder.stream.read_u8()?;
        // https://exiftool.org/TagNames/JPEG.html#Adobe
        match transform {
            0..=2 => decoder.adobe_transform = Some(transform),
            _ => {
                return Err(DecodeErrors::Format(format!(
                    "Unknown Adobe colorspace {transform}"
                )))
            }
        }
        trace!("Adobe APP14 segment, transform {}", transform);
        length -= 12;
    } else {
        warn!("Not a valid Adobe APP14 Segment, skipping");
    }
    // skip any proceeding lengths.
    // we do not need them
    decoder.stream.skip(length)?;

    Ok(())
}

/// Reorder a quantization table from zig-zag to natural order
fn un_zig_zag(a: &[u8; 64]) -> [u16; 64] {
    let mut output = [0; 64];

    for (i, value) in a.iter().enumerate() {
        output[UN_ZIGZAG[i]] = u16::from(*value);
    }

    output
}
