/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const PNG_SIGNATURE: u64 = 0x89504E470D0A1A0A;

/// Initial inflate capacity per compressed byte
pub const INFLATE_HINT_RATIO: usize = 4;

/// Value reported in the `file_type` property
pub const FILE_TYPE: &str = "PNG v. 1.0";

/// Gamma implied when no gAMA chunk is present, and by an sRGB chunk
pub const DEFAULT_FILE_GAMMA: f32 = 45455.0 / 100000.0;

/// White point x/y then red, green and blue x/y implied by an sRGB chunk
pub const SRGB_CHROMATICITY: [f32; 8] = [
    31270.0 / 100000.0,
    32900.0 / 100000.0,
    64000.0 / 100000.0,
    33000.0 / 100000.0,
    30000.0 / 100000.0,
    60000.0 / 100000.0,
    15000.0 / 100000.0,
    6000.0 / 100000.0
];

/// Property names for the eight chromaticity values, in chunk order
pub const CHROMATICITY_KEYS: [&str; 8] = [
    "white_point_x",
    "white_point_y",
    "red_x",
    "red_y",
    "green_x",
    "green_y",
    "blue_x",
    "blue_y"
];

/// Scale a sample with fewer than 8 bits to the full 8 bit range,
/// indexed by bit depth
pub const DEPTH_SCALE_TABLE: [u8; 9] = [0, 0xff, 0x55, 0, 0x11, 0, 0, 0, 0x01];
