/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical Huffman codes
//!
//! Both DEFLATE and JPEG describe their prefix codes by code length only,
//! the actual codes follow from the lengths by the canonical construction
//! of RFC 1951 section 3.2.2.
//!
//! A [`HuffmanTree`] keeps the per-symbol codes (useful for encoding fixtures)
//! and a binary decision tree which is walked one bit at a time
//! while decoding.
use core::fmt::{Debug, Display, Formatter};

use crate::bitstream::{BitBuffer, BitOrder, BitStreamError};
use crate::errors::ErrorKind;

/// Longest code length supported, JPEG allows 16 bits, DEFLATE 15
pub const MAX_CODE_LENGTH: usize = 16;

/// Errors raised when building or decoding with a [`HuffmanTree`]
pub enum HuffmanErrors {
    /// A code length larger than [`MAX_CODE_LENGTH`]
    CodeTooLong { symbol: usize, length: u8 },
    /// The code lengths describe more codes than can exist
    OverSubscribed,
    /// The number of symbols does not match the number of code lengths
    SymbolCountMismatch { lengths: usize, symbols: usize },
    /// A symbol was given more than one code
    DuplicateSymbol(u16),
    /// The bits read do not form any code of the table
    InvalidCode,
    /// Not enough bits to finish a code
    BitStream(BitStreamError)
}

impl HuffmanErrors {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Corrupt
    }
}

impl Debug for HuffmanErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CodeTooLong { symbol, length } => write!(
                f,
                "Code length {length} for symbol {symbol} is larger than {MAX_CODE_LENGTH}"
            ),
            Self::OverSubscribed => writeln!(f, "Over-subscribed code lengths, not a prefix code"),
            Self::SymbolCountMismatch { lengths, symbols } => write!(
                f,
                "Got {lengths} code lengths but {symbols} symbols to assign them to"
            ),
            Self::DuplicateSymbol(symbol) => {
                writeln!(f, "Symbol {symbol} appears more than once in the table")
            }
            Self::InvalidCode => writeln!(f, "Bit pattern does not match any Huffman code"),
            Self::BitStream(err) => writeln!(f, "{err:?}")
        }
    }
}

impl Display for HuffmanErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for HuffmanErrors {}

impl From<BitStreamError> for HuffmanErrors {
    fn from(value: BitStreamError) -> Self {
        HuffmanErrors::BitStream(value)
    }
}

/// A single code of a table
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct HuffmanCode {
    /// Length in bits, zero if the symbol has no code
    pub length: u8,
    pub symbol: u16,
    /// The code bits in the order the tree's bit order hands them out,
    /// bit reversed within `length` for [`BitOrder::Lsb`]
    pub bits:   u16
}

#[derive(Copy, Clone, Debug)]
enum Node {
    Leaf(u16),
    Branch([Option<u32>; 2])
}

/// A canonical Huffman code table and its decoding tree
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    // indexed by symbol
    codes:      Vec<HuffmanCode>,
    // node 0 is the root
    nodes:      Vec<Node>,
    order:      BitOrder,
    max_length: u8
}

impl HuffmanTree {
    /// Build a tree where `lengths[i]` is the code length of symbol `i`.
    ///
    /// A length of zero means the symbol has no code.
    pub fn new(lengths: &[u8], order: BitOrder) -> Result<HuffmanTree, HuffmanErrors> {
        let symbols: Vec<u16> = (0..lengths.len() as u16).collect();

        HuffmanTree::new_with_symbols(lengths, &symbols, order)
    }

    /// Build a tree assigning codes in the order of `symbols`,
    /// `lengths[i]` being the code length of `symbols[i]`
    pub fn new_with_symbols(
        lengths: &[u8], symbols: &[u16], order: BitOrder
    ) -> Result<HuffmanTree, HuffmanErrors> {
        if lengths.len() != symbols.len() {
            return Err(HuffmanErrors::SymbolCountMismatch {
                lengths: lengths.len(),
                symbols: symbols.len()
            });
        }
        let mut bl_count = [0_u32; MAX_CODE_LENGTH + 1];

        for (symbol, &length) in lengths.iter().enumerate() {
            if usize::from(length) > MAX_CODE_LENGTH {
                return Err(HuffmanErrors::CodeTooLong { symbol, length });
            }
            bl_count[usize::from(length)] += 1;
        }
        bl_count[0] = 0;

        // Kraft inequality, incomplete codes are fine
        let kraft: u64 = bl_count
            .iter()
            .enumerate()
            .skip(1)
            .map(|(len, count)| u64::from(*count) << (MAX_CODE_LENGTH - len))
            .sum();

        if kraft > 1 << MAX_CODE_LENGTH {
            return Err(HuffmanErrors::OverSubscribed);
        }

        let mut next_code = [0_u32; MAX_CODE_LENGTH + 1];
        let mut code = 0;

        for len in 1..=MAX_CODE_LENGTH {
            code = (code + bl_count[len - 1]) << 1;
            next_code[len] = code;
        }

        let table_size = symbols.iter().map(|x| usize::from(*x) + 1).max().unwrap_or(0);

        let mut tree = HuffmanTree {
            codes: vec![HuffmanCode::default(); table_size],
            nodes: vec![Node::Branch([None, None])],
            order,
            max_length: 0
        };

        for (&length, &symbol) in lengths.iter().zip(symbols) {
            if length == 0 {
                continue;
            }
            if tree.codes[usize::from(symbol)].length != 0 {
                return Err(HuffmanErrors::DuplicateSymbol(symbol));
            }
            let canonical = next_code[usize::from(length)];
            next_code[usize::from(length)] += 1;

            tree.insert(canonical, length, symbol)?;

            let bits = match order {
                BitOrder::Lsb => reverse_bits(canonical, length),
                BitOrder::Msb => canonical
            };
            tree.codes[usize::from(symbol)] = HuffmanCode {
                length,
                symbol,
                bits: bits as u16
            };
            tree.max_length = tree.max_length.max(length);
        }
        Ok(tree)
    }

    /// Build a tree from a JPEG `DHT` record, `counts[i]` being the
    /// number of codes of length `i + 1` and `symbols` the values in
    /// code order.
    pub fn from_jpeg_counts(counts: &[u8; 16], symbols: &[u8]) -> Result<HuffmanTree, HuffmanErrors> {
        let total: usize = counts.iter().map(|x| usize::from(*x)).sum();

        if total != symbols.len() {
            return Err(HuffmanErrors::SymbolCountMismatch {
                lengths: total,
                symbols: symbols.len()
            });
        }
        let mut lengths = Vec::with_capacity(total);

        for (len, count) in (1..=16_u8).zip(counts) {
            lengths.extend(core::iter::repeat(len).take(usize::from(*count)));
        }
        let symbols: Vec<u16> = symbols.iter().map(|x| u16::from(*x)).collect();

        HuffmanTree::new_with_symbols(&lengths, &symbols, BitOrder::Msb)
    }

    /// Walk `canonical` from its most significant bit, the first bit on the wire,
    /// creating branches as needed
    fn insert(&mut self, canonical: u32, length: u8, symbol: u16) -> Result<(), HuffmanErrors> {
        let mut node = 0_usize;

        for depth in (0..length).rev() {
            let bit = ((canonical >> depth) & 1) as usize;

            let Node::Branch(children) = self.nodes[node] else {
                // a shorter code is a prefix of this one
                return Err(HuffmanErrors::OverSubscribed);
            };
            node = match children[bit] {
                Some(child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    let new_node = if depth == 0 {
                        Node::Leaf(symbol)
                    } else {
                        Node::Branch([None, None])
                    };
                    self.nodes.push(new_node);

                    if let Node::Branch(children) = &mut self.nodes[node] {
                        children[bit] = Some(child as u32);
                    }
                    child
                }
            };
        }
        match self.nodes[node] {
            Node::Leaf(s) if s == symbol => Ok(()),
            _ => Err(HuffmanErrors::OverSubscribed)
        }
    }

    /// The per-symbol code table, indexed by symbol
    pub fn codes(&self) -> &[HuffmanCode] {
        &self.codes
    }

    /// The code of `symbol`, if it has one
    pub fn code(&self, symbol: u16) -> Option<HuffmanCode> {
        self.codes
            .get(usize::from(symbol))
            .copied()
            .filter(|code| code.length != 0)
    }

    pub const fn max_length(&self) -> u8 {
        self.max_length
    }

    pub const fn order(&self) -> BitOrder {
        self.order
    }

    /// True if no symbol has a code
    pub const fn is_empty(&self) -> bool {
        self.max_length == 0
    }

    /// Decode one symbol
    ///
    /// # Errors
    /// - [`HuffmanErrors::InvalidCode`] if the bits read lead into an unused branch
    /// - [`HuffmanErrors::BitStream`] if the input ends in the middle of a code
    #[inline]
    pub fn decode(&self, stream: &mut BitBuffer) -> Result<u16, HuffmanErrors> {
        let mut node = 0_usize;
        let mut depth = 0_u8;

        loop {
            let bit = stream.take_bit()? as usize;
            depth += 1;

            let Node::Branch(children) = self.nodes[node] else {
                unreachable!("Huffman walk started on a leaf");
            };
            let Some(child) = children[bit] else {
                return Err(HuffmanErrors::InvalidCode);
            };
            node = child as usize;

            if let Node::Leaf(symbol) = self.nodes[node] {
                debug_assert_eq!(self.codes[usize::from(symbol)].length, depth);
                return Ok(symbol);
            }
        }
    }

    /// Decode one symbol, telling an exhausted input apart from a bad code.
    ///
    /// Returns `Ok(None)` when the input runs out before a code is complete,
    /// the bits read so far stay consumed.
    pub fn try_decode(&self, stream: &mut BitBuffer) -> Result<Option<u16>, HuffmanErrors> {
        match self.decode(stream) {
            Ok(symbol) => Ok(Some(symbol)),
            Err(HuffmanErrors::BitStream(BitStreamError::NotEnoughBits { .. })) => Ok(None),
            Err(e) => Err(e)
        }
    }
}

/// Reverse the low `length` bits of `code`
pub const fn reverse_bits(code: u32, length: u8) -> u32 {
    if length == 0 {
        return 0;
    }
    code.reverse_bits() >> (32 - length as u32)
}
