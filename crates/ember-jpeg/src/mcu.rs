/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use ember_core::bitstream::BitBuffer;
use ember_core::log::{trace, warn};

use crate::bitstream::{decode_block, read_entropy_segment};
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::marker::Marker;
use crate::JpegDecoder;

/// How a scan's entropy coded data ended
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ScanEnd {
    /// Every MCU was decoded, the byte is the marker following the data
    Marker(u8),
    /// Every MCU was decoded and the input ended
    EndOfInput,
    /// The data ran out before every MCU was decoded
    Truncated
}

impl<'a> JpegDecoder<'a> {
    /// Check for existence of DC and AC Huffman Tables and the
    /// quantization tables of the current scan's components
    pub(crate) fn check_tables(&self) -> Result<(), DecodeErrors> {
        for &pos in &self.z_order[..usize::from(self.num_scans)] {
            let component = &self.components[pos];

            if self.dc_huffman_tables[component.dc_huff_table].is_none() {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No DC table {} for component {}",
                    component.dc_huff_table, component.id
                )));
            }
            if self.ac_huffman_tables[component.ac_huff_table].is_none() {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No AC table {} for component {}",
                    component.ac_huff_table, component.id
                )));
            }
            if self.qt_tables[usize::from(component.quantization_table_number)].is_none() {
                return Err(DecodeErrors::DqtError(format!(
                    "No quantization table {} for component {}",
                    component.quantization_table_number, component.id
                )));
            }
        }
        Ok(())
    }

    /// Decode the scan whose header was just parsed.
    ///
    /// Single component scans walk that component's blocks in raster order,
    /// scans with more components walk the MCU grid. Restart markers are
    /// expected every `restart_interval` MCUs.
    pub(crate) fn decode_scan(&mut self) -> Result<ScanEnd, DecodeErrors> {
        if self.is_progressive
            || self.spec_start != 0
            || self.spec_end != 63
            || self.succ_high != 0
            || self.succ_low != 0
        {
            return Err(DecodeErrors::Unsupported(
                UnsupportedSchemes::ProgressiveDctHuffman
            ));
        }
        self.check_tables()?;

        let scan_components = usize::from(self.num_scans);
        let order = self.z_order;

        for &pos in &order[..scan_components] {
            let component = &mut self.components[pos];

            if let Some(table) = self.qt_tables[usize::from(component.quantization_table_number)] {
                component.quantization_table = table;
            }
        }

        let interleaved = scan_components > 1;

        let (mcus_per_line, mcu_lines) = if interleaved {
            (self.mcu_x, self.mcu_y)
        } else {
            self.components[order[0]].scan_blocks()
        };
        let total = mcus_per_line * mcu_lines;

        trace!(
            "Decoding scan of {} component(s), {}x{} MCUs",
            scan_components,
            mcus_per_line,
            mcu_lines
        );

        let mut segment = Vec::new();
        let mut block = [0_i16; 64];
        let mut expected_rst = 0_u8;
        let mut mcu = 0;

        loop {
            // every segment starts with fresh predictions
            let mut eob_run = 0;

            for &pos in &order[..scan_components] {
                self.components[pos].dc_pred = 0;
            }
            let terminator = read_entropy_segment(&mut self.stream, &mut segment)?;
            let mut stream = BitBuffer::new_msb(&segment);

            let end = if self.restart_interval == 0 {
                total
            } else {
                total.min(mcu + self.restart_interval)
            };

            while mcu < end {
                let (x, y) = (mcu % mcus_per_line, mcu / mcus_per_line);

                if !self.decode_mcu(x, y, interleaved, &mut stream, &mut eob_run, &mut block)? {
                    let resync = self.restart_interval != 0
                        && terminator.and_then(Marker::from_u8) == Some(Marker::RST(expected_rst));

                    if !resync {
                        return self.truncated(mcu, total);
                    }
                    // the next interval starts at the restart marker
                    self.damaged_interval(mcu, end)?;
                    mcu = end;
                    break;
                }
                mcu += 1;
            }

            if mcu == total {
                return Ok(match terminator {
                    Some(code) => ScanEnd::Marker(code),
                    None => ScanEnd::EndOfInput
                });
            }
            // a restart marker should end this segment
            let Some(code) = terminator else {
                return self.truncated(mcu, total);
            };
            match Marker::from_u8(code) {
                Some(Marker::RST(n)) if n == expected_rst => {
                    trace!("Restart marker RST{} after MCU {}", n, mcu);
                }
                Some(Marker::EOI) => return self.truncated(mcu, total),
                _ => {
                    return Err(DecodeErrors::RstError(format!(
                        "Expected RST{} (0xFF{:X}) after MCU {}, found 0xFF{:X}",
                        expected_rst,
                        0xD0 + expected_rst,
                        mcu,
                        code
                    )));
                }
            }
            expected_rst = (expected_rst + 1) & 7;
        }
    }

    /// Decode one MCU, or one block of a single component scan.
    ///
    /// Returns `Ok(false)` if the entropy segment ran out.
    fn decode_mcu(
        &mut self, x: usize, y: usize, interleaved: bool, stream: &mut BitBuffer,
        eob_run: &mut u32, block: &mut [i16; 64]
    ) -> Result<bool, DecodeErrors> {
        let order = self.z_order;

        for &pos in &order[..usize::from(self.num_scans)] {
            let component = &mut self.components[pos];

            let (Some(dc_table), Some(ac_table)) = (
                self.dc_huffman_tables[component.dc_huff_table].as_ref(),
                self.ac_huffman_tables[component.ac_huff_table].as_ref()
            ) else {
                return Err(DecodeErrors::FormatStatic("Missing huffman table"));
            };

            let (h, v) = if interleaved {
                (component.horizontal_sample, component.vertical_sample)
            } else {
                (1, 1)
            };

            for v_samp in 0..v {
                for h_samp in 0..h {
                    // Fill the array with zeroes, decode_block expects
                    // a zero based array.
                    block.fill(0);

                    if !decode_block(
                        stream,
                        dc_table,
                        ac_table,
                        &mut component.dc_pred,
                        eob_run,
                        block
                    )? {
                        return Ok(false);
                    }
                    component
                        .block_mut(x * h + h_samp, y * v + v_samp)
                        .copy_from_slice(block);
                }
            }
        }
        Ok(true)
    }

    /// A restart interval ran out of data before its restart marker,
    /// MCUs `mcu..end` stay flat
    fn damaged_interval(&self, mcu: usize, end: usize) -> Result<(), DecodeErrors> {
        if self.options.get_strict_mode() {
            return Err(DecodeErrors::MCUError(format!(
                "[strict-mode]: Restart interval ended after MCU {mcu}, expected {end} MCUs"
            )));
        }
        warn!(
            "Restart interval ended after MCU {}, MCUs up to {} stay flat",
            mcu, end
        );
        Ok(())
    }

    /// The entropy coded data ended early, keep what was decoded unless
    /// running in strict mode
    fn truncated(&self, mcu: usize, total: usize) -> Result<ScanEnd, DecodeErrors> {
        if self.options.get_strict_mode() {
            return Err(DecodeErrors::MCUError(format!(
                "[strict-mode]: Entropy coded data ended after {mcu} of {total} MCUs"
            )));
        }
        warn!(
            "Entropy coded data ended after {} of {} MCUs, the remaining blocks stay flat",
            mcu, total
        );
        Ok(ScanEnd::Truncated)
    }
}
