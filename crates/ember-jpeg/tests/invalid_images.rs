/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::errors::ErrorKind;
use ember_jpeg::errors::DecodeErrors;
use ember_jpeg::JpegDecoder;

#[test]
fn eof() {
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xa4]);

    decoder.decode().unwrap_err();
}

#[test]
fn bad_ff_marker_size() {
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xff, 0x00, 0x00, 0x00]);

    let _ = decoder.decode().unwrap_err();
}

#[test]
fn scan_before_frame() {
    let mut decoder = JpegDecoder::new(&[255, 216, 255, 218, 232, 197, 255]);

    let err = decoder.decode().unwrap_err();

    assert!(
        matches!(err, DecodeErrors::FormatStatic(x) if x == "Start of scan found before start of frame")
    );
}

#[test]
fn huffman_length_subtraction_overflow() {
    let mut decoder = JpegDecoder::new(&[255, 216, 255, 196, 0, 0]);

    let err = decoder.decode().unwrap_err();

    assert!(
        matches!(err, DecodeErrors::FormatStatic(x) if x == "Invalid Huffman length in image")
    );
}

#[test]
fn index_oob() {
    let mut decoder = JpegDecoder::new(&[255, 216, 255, 218, 0, 8, 1, 0, 8, 1]);

    let _ = decoder.decode().unwrap_err();
}

#[test]
fn mul_with_overflow() {
    let mut decoder = JpegDecoder::new(&[255, 216, 255, 192, 255, 1, 8, 9, 119, 48, 255, 192]);

    let err = decoder.decode().unwrap_err();

    assert!(
        matches!(err, DecodeErrors::SofError(x) if x == "Length of start of frame differs from expected 584,value is 65281")
    );
}

#[test]
fn bad_magic_bytes() {
    let mut decoder = JpegDecoder::new(&[0x89, b'P', b'N', b'G']);

    let err = decoder.decode_headers().unwrap_err();

    assert!(matches!(err, DecodeErrors::IllegalMagicBytes(0x8950)));
    assert_eq!(err.kind(), ErrorKind::Corrupt);
}

#[test]
fn empty_input() {
    let mut decoder = JpegDecoder::new(&[]);

    assert_eq!(decoder.decode().unwrap_err().kind(), ErrorKind::Corrupt);
}

#[test]
fn only_start_and_end_of_image() {
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xff, 0xd9]);

    let err = decoder.decode().unwrap_err();

    assert!(matches!(err, DecodeErrors::FormatStatic(x) if x == "Premature End of image"));
}

#[test]
fn second_start_of_image() {
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xff, 0xd8]);

    assert_eq!(decoder.decode().unwrap_err().kind(), ErrorKind::Corrupt);
}

#[test]
fn lossless_frame_is_unsupported() {
    // SOF3 header, rejected on sight
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xff, 0xc3, 0x00, 0x0b, 0x08]);

    let err = decoder.decode_headers().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn arithmetic_frame_is_unsupported() {
    let mut decoder = JpegDecoder::new(&[0xff, 0xd8, 0xff, 0xc9, 0x00, 0x0b, 0x08]);

    assert_eq!(
        decoder.decode_headers().unwrap_err().kind(),
        ErrorKind::Unsupported
    );
}

#[test]
fn zero_dimensions() {
    let mut decoder = JpegDecoder::new(&[
        0xff, 0xd8, 0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x00, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00
    ]);

    assert!(matches!(
        decoder.decode_headers().unwrap_err(),
        DecodeErrors::ZeroError
    ));
}
