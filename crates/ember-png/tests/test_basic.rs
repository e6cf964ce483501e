/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Hand assembled images exercising chunk handling and pixel expansion
use std::io::Write;

use ember_core::options::DecoderOptions;
use ember_png::error::PngDecodeErrors;
use ember_png::{InterlaceMethod, PngColor, PngDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Wrap `data` in a zlib stream of stored blocks
fn zlib_stored(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::none());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn zlib_compressed(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Append a chunk, the crc is not verified by the decoder so it is left zero
fn chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0; 4]);
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut data = vec![];
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    data
}

/// A complete png with a single IDAT holding `scanlines`
fn make_png(header: &[u8], extra: &[(&[u8; 4], &[u8])], scanlines: &[u8]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();

    chunk(&mut out, b"IHDR", header);
    for (name, data) in extra {
        chunk(&mut out, name, data);
    }
    chunk(&mut out, b"IDAT", &zlib_stored(scanlines));
    chunk(&mut out, b"IEND", &[]);
    out
}

#[test]
fn test_single_rgb_pixel() {
    let png = make_png(&ihdr(1, 1, 8, 2, 0), &[], &[0x00, 12, 34, 56]);

    let image = PngDecoder::new(&png).decode().unwrap();

    assert_eq!(image.width, 1);
    assert_eq!(image.height, 1);
    assert_eq!(image.data, [12, 34, 56, 255]);
}

#[test]
fn test_paeth_zero_delta() {
    // 2x2 gray, every row paeth filtered with zero deltas
    let png = make_png(&ihdr(2, 2, 8, 0, 0), &[], &[4, 0, 0, 4, 0, 0]);

    let raw = PngDecoder::new(&png).decode_raw().unwrap();
    assert_eq!(raw, [0, 0, 0, 0]);

    // first row sub filtered to [10, 30], second row paeth with zero deltas
    // predicts the pixels above it
    let png = make_png(&ihdr(2, 2, 8, 0, 0), &[], &[1, 10, 20, 4, 0, 0]);

    let raw = PngDecoder::new(&png).decode_raw().unwrap();
    assert_eq!(raw, [10, 30, 10, 30]);
}

#[test]
fn test_all_filters() {
    // 3x1 RGB rows, one per filter type
    #[rustfmt::skip]
    let scanlines = [
        0, 10, 20, 30, 40, 50, 60,
        1, 1, 1, 1, 2, 2, 2,
        2, 1, 1, 1, 1, 1, 1,
        3, 2, 2, 2, 0, 0, 0,
        4, 0, 0, 0, 1, 1, 1,
    ];
    let png = make_png(&ihdr(2, 5, 8, 2, 0), &[], &scanlines);

    let raw = PngDecoder::new(&png).decode_raw().unwrap();

    #[rustfmt::skip]
    let expected = [
        10, 20, 30, 40, 50, 60,
        // sub: 1, then 1 + 2
        1, 1, 1, 3, 3, 3,
        // up: row above + 1
        2, 2, 2, 4, 4, 4,
        // average: 2 + 2/2, then (3 + 4)/2
        3, 3, 3, 3, 3, 3,
        // paeth: first pixel takes above, second predicts from a = b = c = 3
        3, 3, 3, 4, 4, 4,
    ];
    assert_eq!(raw, expected);
}

#[test]
fn test_grayscale_depths_scale() {
    // 1 bit, 8 pixels wide: 1010_1010
    let png = make_png(&ihdr(8, 1, 1, 0, 0), &[], &[0, 0b1010_1010]);
    let image = PngDecoder::new(&png).decode().unwrap();

    let gray: Vec<u8> = image.data.chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(gray, [255, 0, 255, 0, 255, 0, 255, 0]);

    // 4 bit, 3 pixels wide, padded to two bytes
    let png = make_png(&ihdr(3, 1, 4, 0, 0), &[], &[0, 0x0F, 0x80]);
    let image = PngDecoder::new(&png).decode().unwrap();

    let gray: Vec<u8> = image.data.chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(gray, [0, 255, 136]);
}

#[test]
fn test_sixteen_bit_keeps_high_byte() {
    let png = make_png(&ihdr(1, 1, 16, 6, 0), &[], &[0, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]);

    let image = PngDecoder::new(&png).decode().unwrap();
    assert_eq!(image.data, [0x12, 0x56, 0x9A, 0xDE]);
}

#[test]
fn test_palette_and_transparency() {
    let palette = [255, 0, 0, 0, 255, 0, 0, 0, 255];
    let trns = [128];
    let png = make_png(
        &ihdr(3, 1, 8, 3, 0),
        &[(b"PLTE", &palette), (b"tRNS", &trns)],
        &[0, 2, 1, 0]
    );

    let image = PngDecoder::new(&png).decode().unwrap();

    assert_eq!(
        image.data,
        [0, 0, 255, 255, 0, 255, 0, 255, 255, 0, 0, 128]
    );
}

#[test]
fn test_palette_index_out_of_range() {
    let palette = [255, 0, 0];
    let png = make_png(&ihdr(2, 1, 8, 3, 0), &[(b"PLTE", &palette)], &[0, 0, 1]);

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(err.kind().is_corrupt());
}

#[test]
fn test_indexed_without_palette_is_gray() {
    let png = make_png(&ihdr(2, 1, 8, 3, 0), &[], &[0, 7, 200]);

    let image = PngDecoder::new(&png).decode().unwrap();
    assert_eq!(image.data, [7, 7, 7, 255, 200, 200, 200, 255]);
}

#[test]
fn test_gray_color_key() {
    let png = make_png(&ihdr(2, 1, 8, 0, 0), &[(b"tRNS", &[0, 9])], &[0, 9, 10]);

    let image = PngDecoder::new(&png).decode().unwrap();
    assert_eq!(image.data, [9, 9, 9, 0, 10, 10, 10, 255]);
}

#[test]
fn test_multiple_idat_chunks() {
    let scanlines = [0, 1, 2, 3, 0, 4, 5, 6];
    let stream = zlib_compressed(&scanlines);
    let (first, second) = stream.split_at(stream.len() / 2);

    let mut png = SIGNATURE.to_vec();
    chunk(&mut png, b"IHDR", &ihdr(1, 2, 8, 2, 0));
    chunk(&mut png, b"IDAT", first);
    chunk(&mut png, b"tEXt", b"Comment\0between idat chunks");
    chunk(&mut png, b"IDAT", second);
    chunk(&mut png, b"IEND", &[]);

    let raw = PngDecoder::new(&png).decode_raw().unwrap();
    assert_eq!(raw, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_headers_only() {
    let png = make_png(&ihdr(7, 3, 8, 6, 0), &[], &[0; 3 * 29]);

    let mut decoder = PngDecoder::new(&png);
    assert!(decoder.get_info().is_none());

    decoder.decode_headers().unwrap();
    let info = decoder.get_info().unwrap();

    assert_eq!(decoder.get_dimensions(), Some((7, 3)));
    assert_eq!(info.color, PngColor::RGBA);
    assert_eq!(info.depth, 8);
    assert_eq!(info.component, 4);
    assert_eq!(info.interlace_method, InterlaceMethod::Standard);

    let image = decoder.decode().unwrap();
    assert_eq!(image.data.len(), 7 * 3 * 4);
}

#[test]
fn test_bad_signature() {
    let mut png = make_png(&ihdr(1, 1, 8, 2, 0), &[], &[0, 1, 2, 3]);
    png[1] = b'Q';

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(matches!(err, PngDecodeErrors::BadSignature));
}

#[test]
fn test_missing_idat() {
    let mut png = SIGNATURE.to_vec();
    chunk(&mut png, b"IHDR", &ihdr(1, 1, 8, 2, 0));
    chunk(&mut png, b"IEND", &[]);

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(err.kind().is_corrupt());
}

#[test]
fn test_interlace_unsupported() {
    let png = make_png(&ihdr(1, 1, 8, 2, 1), &[], &[0, 1, 2, 3]);

    let mut decoder = PngDecoder::new(&png);
    // headers still decode
    decoder.decode_headers().unwrap();
    assert_eq!(
        decoder.get_info().unwrap().interlace_method,
        InterlaceMethod::Adam7
    );

    let err = decoder.decode().unwrap_err();
    assert!(err.kind().is_unsupported());
}

#[test]
fn test_unknown_chunks() {
    // ancillary chunks are skipped
    let png = make_png(&ihdr(1, 1, 8, 2, 0), &[(b"abCd", &[1, 2, 3])], &[0, 1, 2, 3]);
    assert!(PngDecoder::new(&png).decode().is_ok());

    // critical ones are not
    let png = make_png(&ihdr(1, 1, 8, 2, 0), &[(b"ABCD", &[1, 2, 3])], &[0, 1, 2, 3]);
    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(err.kind().is_unsupported());
}

#[test]
fn test_invalid_headers() {
    // 16 bit palette
    let png = make_png(&ihdr(1, 1, 16, 3, 0), &[], &[0, 1]);
    assert!(PngDecoder::new(&png).decode().unwrap_err().kind().is_corrupt());

    // zero width
    let png = make_png(&ihdr(0, 1, 8, 2, 0), &[], &[0]);
    assert!(PngDecoder::new(&png).decode().unwrap_err().kind().is_corrupt());

    // unknown colour type
    let png = make_png(&ihdr(1, 1, 8, 5, 0), &[], &[0, 1]);
    assert!(PngDecoder::new(&png).decode().unwrap_err().kind().is_corrupt());
}

#[test]
fn test_dimension_limits() {
    let png = make_png(&ihdr(64, 1, 8, 0, 0), &[], &[0; 65]);

    let options = DecoderOptions::default().set_max_width(32);
    let err = PngDecoder::new_with_options(&png, options)
        .decode()
        .unwrap_err();
    assert!(err.kind().is_corrupt());

    let options = DecoderOptions::default().set_max_width(64);
    assert!(PngDecoder::new_with_options(&png, options).decode().is_ok());
}

#[test]
fn test_unknown_filter_type() {
    let png = make_png(&ihdr(1, 1, 8, 2, 0), &[], &[5, 1, 2, 3]);

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(err.kind().is_corrupt());
}

#[test]
fn test_short_image_data() {
    let png = make_png(&ihdr(2, 2, 8, 2, 0), &[], &[0, 1, 2, 3, 4, 5, 6]);

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(err.kind().is_corrupt());
}

#[test]
fn test_truncated_chunk() {
    let png = make_png(&ihdr(1, 1, 8, 2, 0), &[], &[0, 1, 2, 3]);
    // cut into the IDAT chunk
    let truncated = &png[..png.len() - 20];

    let err = PngDecoder::new(truncated).decode().unwrap_err();
    assert!(err.kind().is_corrupt());
}

#[test]
fn test_missing_iend() {
    let mut png = SIGNATURE.to_vec();
    chunk(&mut png, b"IHDR", &ihdr(1, 1, 8, 2, 0));
    chunk(&mut png, b"IDAT", &zlib_stored(&[0, 1, 2, 3]));

    let image = PngDecoder::new(&png).decode().unwrap();
    assert_eq!(image.data, [1, 2, 3, 255]);

    let options = DecoderOptions::default().set_strict_mode(true);
    assert!(PngDecoder::new_with_options(&png, options).decode().is_err());
}

#[test]
fn test_bad_checksum() {
    let mut png = SIGNATURE.to_vec();
    let mut idat = zlib_stored(&[0, 1, 2, 3]);
    let last = idat.len() - 1;
    idat[last] ^= 0xFF;

    chunk(&mut png, b"IHDR", &ihdr(1, 1, 8, 2, 0));
    chunk(&mut png, b"IDAT", &idat);
    chunk(&mut png, b"IEND", &[]);

    let err = PngDecoder::new(&png).decode().unwrap_err();
    assert!(matches!(err, PngDecodeErrors::ZlibDecodeErrors(_)));

    let options = DecoderOptions::default().set_confirm_checksums(false);
    let image = PngDecoder::new_with_options(&png, options).decode().unwrap();
    assert_eq!(image.data, [1, 2, 3, 255]);
}
