/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The 8 byte signature every png file starts with
pub const PNG_SIGNATURE: u64 = 0x89504E47_0D0A1A0A;

/// Length of the `IHDR` payload
pub const IHDR_LENGTH: usize = 13;

/// Maximum number of palette entries
pub const MAX_PALETTE_ENTRIES: usize = 256;
