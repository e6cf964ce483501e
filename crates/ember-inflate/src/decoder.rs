/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::cmp::min;
use std::sync::OnceLock;

use ember_core::bitstream::{BitBuffer, BitOrder};
use ember_core::bytestream::ByteReader;
use ember_core::huffman::HuffmanTree;
use ember_core::log::trace;

use crate::constants::{
    fixed_litlen_lengths, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_STATIC,
    DEFLATE_BLOCKTYPE_UNCOMPRESSED, DEFLATE_END_OF_BLOCK, DEFLATE_FIRST_LENGTH_SYMBOL,
    DEFLATE_MAX_LITLEN_SYMS_IN_HEADER, DEFLATE_MAX_OFFSET_SYMS_IN_HEADER, DEFLATE_NUM_OFFSET_SYMS,
    DEFLATE_NUM_PRECODE_SYMS, DEFLATE_PRECODE_LENS_PERMUTATION, DISTANCE_BASE,
    DISTANCE_EXTRA_BITS, LENGTH_BASE, LENGTH_EXTRA_BITS
};
use crate::errors::InflateDecodeErrors;

/// Options that can influence decompression
/// in Deflate/Zlib
#[derive(Copy, Clone, Debug)]
pub struct DeflateOptions {
    limit:            usize,
    confirm_checksum: bool,
    size_hint:        usize
}

impl Default for DeflateOptions {
    fn default() -> Self {
        DeflateOptions {
            limit:            1 << 30,
            confirm_checksum: true,
            size_hint:        37000
        }
    }
}

impl DeflateOptions {
    /// Get deflate/zlib limit option
    ///
    /// The decoder won't extend the inbuilt limit and will
    /// return an error if the limit is exceeded
    ///
    /// # Returns
    /// The currently set limit of the instance
    pub const fn get_limit(&self) -> usize {
        self.limit
    }

    /// Set a limit to the internal vector
    /// used to store decoded zlib/deflate output.
    ///
    /// # Arguments
    /// limit: The new decompressor limit
    /// # Returns
    /// A modified version of DeflateOptions
    ///
    /// # Note
    /// This is just a hint, the decoder may allocate less
    /// than the limit, but never more
    pub fn set_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Get whether the decoder will confirm a checksum
    /// after decoding
    pub const fn get_confirm_checksum(&self) -> bool {
        self.confirm_checksum
    }

    /// Set whether the decoder should confirm a checksum
    /// after decoding
    ///
    /// Note, you should definitely confirm your checksum, use this
    /// with caution, otherwise data returned may be corrupt
    ///
    /// # Arguments
    /// - yes: When true, the decoder will confirm checksum
    /// when false, the decoder will skip checksum verification
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self {
        self.confirm_checksum = yes;
        self
    }

    /// Get the default size hint for the decompressor
    ///
    /// The decompressor initializes the internal storage for decompressed bytes
    /// with this size and will reallocate the vec if the decompressed size becomes bigger
    /// than this, but when the caller knows the size of data before decompression,
    /// you can set this to be the size of the decompressed data, and the decoder
    /// will not reallocate
    pub const fn get_size_hint(&self) -> usize {
        self.size_hint
    }

    /// Set the size hint for the decompressor
    ///
    /// The hint is capped by the limit, see [`DeflateOptions::set_limit`]
    pub fn set_size_hint(mut self, hint: usize) -> Self {
        self.size_hint = hint;
        self
    }
}

/// The fixed literal/length and distance trees of RFC 1951 section 3.2.6
///
/// Built on first use and shared by every decoder afterwards.
fn fixed_trees() -> &'static (HuffmanTree, HuffmanTree) {
    static FIXED_TREES: OnceLock<(HuffmanTree, HuffmanTree)> = OnceLock::new();

    FIXED_TREES.get_or_init(|| {
        let litlen = build_fixed_tree(&fixed_litlen_lengths());
        let offset = build_fixed_tree(&[5; DEFLATE_NUM_OFFSET_SYMS]);

        (litlen, offset)
    })
}

fn build_fixed_tree(lengths: &[u8]) -> HuffmanTree {
    match HuffmanTree::new(lengths, BitOrder::Lsb) {
        Ok(tree) => tree,
        Err(err) => unreachable!("fixed code lengths form a complete prefix code, {err:?}")
    }
}

/// A deflate decoder instance.
///
/// The decoder manages output buffer as opposed to requiring the caller to provide a pre-allocated buffer
/// it tracks number of bytes written and on successfully reaching the
/// end of the block, will return a vector with exactly
/// the number of decompressed bytes.
///
/// This means that it may use up huge amounts of memory if not checked, but
/// there are [options] that can prevent that
///
/// [options]: DeflateOptions
pub struct DeflateDecoder<'a> {
    data:    &'a [u8],
    options: DeflateOptions
}

impl<'a> DeflateDecoder<'a> {
    /// Create a new decompressor that will read compressed
    /// data from `data` and return a new vector containing new data
    ///
    /// # Arguments
    /// - `data`: The compressed data. Data can be of any type
    /// gzip,zlib or raw deflate.
    ///
    /// # Returns
    /// A decoder instance which will pull compressed data from `data` to inflate the output output
    ///
    /// # Note
    ///
    /// The default output size limit is **1 GiB.**
    /// this is to protect the end user against ddos attacks as deflate
    /// does not specify it's output size upfront
    ///
    /// The checksum will be verified depending on the called function.
    /// this only works for zlib streams, raw deflate has no checksum
    ///
    /// Use [`new_with_options`] to change both
    ///
    /// [`new_with_options`]: Self::new_with_options
    pub fn new(data: &'a [u8]) -> DeflateDecoder<'a> {
        DeflateDecoder::new_with_options(data, DeflateOptions::default())
    }

    /// Create new decoder with specified options
    ///
    /// This can be used to fine tune the decoder to the user's
    /// needs.
    ///
    /// # Arguments
    /// - `data`: The compressed data
    /// - `options`: A set of user defined options which tune how the decompressor decodes
    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> DeflateDecoder<'a> {
        DeflateDecoder { data, options }
    }

    /// Decode zlib-encoded data returning the uncompressed in a `Vec<u8>`
    /// or an error if something went wrong.
    ///
    /// Bytes after the adler32 trailer are ignored.
    ///
    /// # Errors
    /// - A corrupt header or stream, a checksum mismatch (if enabled)
    /// or an output larger than the configured limit.
    /// - A stream requiring a preset dictionary is reported as unsupported.
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, InflateDecodeErrors> {
        if self.data.len() < 2 {
            return Err(InflateDecodeErrors::InsufficientData);
        }

        // Zlib flags
        // See https://www.ietf.org/rfc/rfc1950.txt for
        // the RFC
        let cmf = self.data[0];
        let flg = self.data[1];

        let cm = cmf & 0xF;
        let cinfo = cmf >> 4;

        // confirm we have the right deflate methods
        if cm != 8 {
            if cm == 15 {
                return Err(InflateDecodeErrors::Generic(
                    "CM of 15 is preserved by the standard,currently don't know how to handle it"
                ));
            }
            return Err(InflateDecodeErrors::GenericStr(format!(
                "Unknown zlib compression method {cm}"
            )));
        }
        if cinfo > 7 {
            return Err(InflateDecodeErrors::GenericStr(format!(
                "Unknown cinfo `{cinfo}` greater than 7, not allowed"
            )));
        }
        let flag_checks = (u16::from(cmf) * 256) + u16::from(flg);

        if flag_checks % 31 != 0 {
            return Err(InflateDecodeErrors::Generic("FCHECK integrity not preserved"));
        }
        if (flg >> 5) & 1 == 1 {
            return Err(InflateDecodeErrors::Unsupported(
                "Preset dictionaries are not supported"
            ));
        }

        let (out, used) = self.inflate(&self.data[2..])?;

        if self.options.confirm_checksum {
            let mut trailer = ByteReader::new(&self.data[2 + used..]);

            let expected = trailer
                .read_u32_be()
                .map_err(|_| InflateDecodeErrors::Generic("Missing adler32 checksum"))?;

            let mut hasher = simd_adler32::Adler32::new();
            hasher.write(&out);
            let found = hasher.finish();

            if expected != found {
                return Err(InflateDecodeErrors::MismatchedAdler(expected, found));
            }
        }

        Ok(out)
    }

    /// Decode a raw deflate stream
    ///
    /// Bytes after the final block are ignored.
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, InflateDecodeErrors> {
        self.inflate(self.data).map(|(out, _)| out)
    }

    /// Inflate `data`, returning the output and the number of whole
    /// bytes the deflate stream occupied
    fn inflate(&self, data: &[u8]) -> Result<(Vec<u8>, usize), InflateDecodeErrors> {
        let mut stream = BitBuffer::new_lsb(data);
        let mut out = Vec::with_capacity(min(self.options.size_hint, self.options.limit));

        loop {
            let is_last_block = stream.take_bit()? == 1;
            let block_type = stream.take(2)?;

            match block_type {
                DEFLATE_BLOCKTYPE_UNCOMPRESSED => {
                    trace!("Stored block at byte {}", stream.position());
                    self.stored_block(&mut stream, &mut out)?;
                }
                DEFLATE_BLOCKTYPE_STATIC => {
                    trace!("Fixed Huffman block at byte {}", stream.position());
                    let (litlen, offset) = fixed_trees();

                    self.huffman_block(&mut stream, litlen, offset, &mut out)?;
                }
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => {
                    trace!("Dynamic Huffman block at byte {}", stream.position());
                    let (litlen, offset) = read_dynamic_trees(&mut stream)?;

                    self.huffman_block(&mut stream, &litlen, &offset, &mut out)?;
                }
                _ => return Err(InflateDecodeErrors::Generic("Reserved block type 3 is invalid"))
            }
            if is_last_block {
                break;
            }
        }
        stream.align_to_byte();

        let used = stream.position() - usize::from(stream.bits_left() / 8);

        Ok((out, used))
    }

    fn stored_block(
        &self, stream: &mut BitBuffer, out: &mut Vec<u8>
    ) -> Result<(), InflateDecodeErrors> {
        stream.align_to_byte();

        let len = stream.take(16)? as u16;
        let nlen = stream.take(16)? as u16;

        if len ^ nlen != 0xFFFF {
            return Err(InflateDecodeErrors::StoredLengthMismatch { len, nlen });
        }
        self.check_limit(out.len(), usize::from(len))?;

        stream.read_aligned_bytes(usize::from(len), out)?;

        Ok(())
    }

    fn huffman_block(
        &self, stream: &mut BitBuffer, litlen: &HuffmanTree, offset: &HuffmanTree,
        out: &mut Vec<u8>
    ) -> Result<(), InflateDecodeErrors> {
        loop {
            let symbol = litlen.decode(stream)?;

            if symbol < 256 {
                self.check_limit(out.len(), 1)?;
                out.push(symbol as u8);
                continue;
            }
            if symbol == DEFLATE_END_OF_BLOCK {
                return Ok(());
            }
            let index = usize::from(symbol - DEFLATE_FIRST_LENGTH_SYMBOL);

            if index >= LENGTH_BASE.len() {
                return Err(InflateDecodeErrors::GenericStr(format!(
                    "Invalid literal/length symbol {symbol}"
                )));
            }
            let length =
                usize::from(LENGTH_BASE[index]) + stream.take(LENGTH_EXTRA_BITS[index])? as usize;

            let offset_symbol = usize::from(offset.decode(stream)?);

            if offset_symbol >= DISTANCE_BASE.len() {
                return Err(InflateDecodeErrors::GenericStr(format!(
                    "Invalid distance symbol {offset_symbol}"
                )));
            }
            let distance = usize::from(DISTANCE_BASE[offset_symbol])
                + stream.take(DISTANCE_EXTRA_BITS[offset_symbol])? as usize;

            if distance > out.len() {
                return Err(InflateDecodeErrors::DistanceTooFar {
                    distance,
                    available: out.len()
                });
            }
            self.check_limit(out.len(), length)?;

            // byte by byte, the source may overlap what we are writing
            out.reserve(length);
            let start = out.len() - distance;

            for i in start..start + length {
                let byte = out[i];
                out.push(byte);
            }
        }
    }

    #[inline]
    fn check_limit(&self, current: usize, extra: usize) -> Result<(), InflateDecodeErrors> {
        let wanted = current.saturating_add(extra);

        if wanted > self.options.limit {
            return Err(InflateDecodeErrors::OutputLimitExceeded(
                self.options.limit,
                wanted
            ));
        }
        Ok(())
    }
}

/// Read the header of a dynamic block, returning the
/// literal/length and distance trees
fn read_dynamic_trees(
    stream: &mut BitBuffer
) -> Result<(HuffmanTree, HuffmanTree), InflateDecodeErrors> {
    let num_litlen_syms = 257 + stream.take(5)? as usize;
    let num_offset_syms = 1 + stream.take(5)? as usize;
    let num_explicit_precode_lens = 4 + stream.take(4)? as usize;

    if num_litlen_syms > DEFLATE_MAX_LITLEN_SYMS_IN_HEADER
        || num_offset_syms > DEFLATE_MAX_OFFSET_SYMS_IN_HEADER
    {
        return Err(InflateDecodeErrors::GenericStr(format!(
            "Too many length or distance symbols, {num_litlen_syms} / {num_offset_syms}"
        )));
    }

    let mut precode_lens = [0; DEFLATE_NUM_PRECODE_SYMS];

    for i in DEFLATE_PRECODE_LENS_PERMUTATION
        .iter()
        .take(num_explicit_precode_lens)
    {
        precode_lens[usize::from(*i)] = stream.take(3)? as u8;
    }
    let precode = HuffmanTree::new(&precode_lens, BitOrder::Lsb)?;

    let total = num_litlen_syms + num_offset_syms;
    let mut lens = vec![0_u8; total];
    let mut i = 0;

    while i < total {
        let symbol = precode.decode(stream)?;

        let (value, repeat) = match symbol {
            0..=15 => (symbol as u8, 1),
            16 => {
                if i == 0 {
                    return Err(InflateDecodeErrors::Generic(
                        "Repeat code 16 with no previous length"
                    ));
                }
                (lens[i - 1], 3 + stream.take(2)? as usize)
            }
            17 => (0, 3 + stream.take(3)? as usize),
            18 => (0, 11 + stream.take(7)? as usize),
            _ => return Err(InflateDecodeErrors::Generic("Invalid precode symbol"))
        };
        if i + repeat > total {
            return Err(InflateDecodeErrors::Generic(
                "Code length repeat overflows the number of symbols"
            ));
        }
        lens[i..i + repeat].fill(value);
        i += repeat;
    }

    if lens[usize::from(DEFLATE_END_OF_BLOCK)] == 0 {
        return Err(InflateDecodeErrors::Generic(
            "Literal/length code has no end of block symbol"
        ));
    }

    let (litlen_lens, offset_lens) = lens.split_at(num_litlen_syms);

    let litlen = HuffmanTree::new(litlen_lens, BitOrder::Lsb)?;
    let offset = HuffmanTree::new(offset_lens, BitOrder::Lsb)?;

    Ok((litlen, offset))
}
