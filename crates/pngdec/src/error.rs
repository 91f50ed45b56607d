/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding
use std::fmt::{Debug, Display, Formatter};

use crate::enums::PngColor;

/// Possible errors that may occur while decoding a png image
///
/// Every error is fatal, the decoder does not attempt to recover
/// from a corrupt stream.
pub enum PngDecodeErrors {
    /// The first eight bytes are not the png magic bytes
    BadSignature,
    /// A chunk or a field inside a chunk ended before all of its bytes could be read
    ///
    /// The argument describes what was being read
    Truncated(&'static str),
    /// The underlying reader returned an error
    IoError(std::io::Error),
    /// Bit depth not one of 1, 2, 4, 8 or 16
    InvalidBitDepth(u8),
    /// Bit depth is valid but not allowed for the colour type
    InvalidBitDepthForColorType(u8, PngColor),
    /// Colour type not one of 0, 2, 3, 4, 6
    InvalidColorType(u8),
    /// Compression method in the header was not zero
    UnsupportedCompression(u8),
    /// Filter method in the header was not zero
    UnsupportedFilter(u8),
    /// Interlace method not one of 0 or 1
    UnsupportedInterlace(u8),
    /// A chunk that needs the palette appeared before it
    ///
    /// The argument is the chunk name
    MissingPalette(&'static str),
    /// pHYs unit specifier was neither 0 nor 1
    InvalidUnitSpecifier(u8),
    /// sBIT entry was zero or larger than the sample depth
    ///
    /// Arguments are the value found and the maximum allowed
    InvalidSignificantBits(u8, u8),
    /// A tRNS chunk was found in an image that already carries alpha
    UnexpectedTransparencyChunk(PngColor),
    /// A palette tRNS chunk carries more entries than the palette
    TransparencyExceedsPalette { entries: usize, palette: usize },
    /// PLTE length is not divisible by three
    InvalidPaletteLength(usize),
    /// A scanline started with a filter byte above 4
    UnknownFilterType(u8),
    /// A tile other than `(0, 0)` was requested from the decoded image
    BadTileRequest(usize, usize),
    /// IHDR chunk length was not 13
    BadHeaderLength(usize),
    /// The first chunk was not IHDR, or the stream ended before IHDR
    MissingHeader,
    /// Width or height was zero
    ZeroDimensions,
    /// Dimensions exceed the configured limits
    ///
    /// Arguments are the found and maximum dimension
    TooLargeDimensions(&'static str, usize, usize),
    /// The concatenated image data could not be inflated
    ZlibDecodeErrors(zune_inflate::errors::InflateDecodeErrors),
    /// Generic message
    Generic(String),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str)
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::Truncated(what) => {
                writeln!(f, "Stream truncated, could not read {what}")
            }
            Self::IoError(err) => writeln!(f, "I/O error {err}"),
            Self::InvalidBitDepth(depth) => {
                writeln!(f, "Invalid bit depth {depth}, expected one of 1, 2, 4, 8, 16")
            }
            Self::InvalidBitDepthForColorType(depth, color) => {
                writeln!(
                    f,
                    "Bit depth {depth} is not allowed for colour type {color:?}"
                )
            }
            Self::InvalidColorType(color) => writeln!(f, "Unknown colour type {color}"),
            Self::UnsupportedCompression(method) => {
                writeln!(f, "Unknown compression method {method}")
            }
            Self::UnsupportedFilter(method) => writeln!(f, "Unknown filter method {method}"),
            Self::UnsupportedInterlace(method) => {
                writeln!(f, "Unknown interlace method {method}")
            }
            Self::MissingPalette(chunk) => {
                writeln!(f, "{chunk} chunk appeared before the PLTE chunk")
            }
            Self::InvalidUnitSpecifier(unit) => {
                writeln!(f, "pHYs unit specifier must be 0 or 1 but found {unit}")
            }
            Self::InvalidSignificantBits(bits, max) => {
                writeln!(f, "Significant bits must be in 1..={max} but found {bits}")
            }
            Self::UnexpectedTransparencyChunk(color) => {
                writeln!(
                    f,
                    "A tRNS chunk shall not appear for colour type {color:?} as it is already transparent"
                )
            }
            Self::TransparencyExceedsPalette { entries, palette } => {
                writeln!(
                    f,
                    "tRNS chunk has {entries} entries but the palette only has {palette}"
                )
            }
            Self::InvalidPaletteLength(length) => {
                writeln!(f, "Invalid PLTE length {length}, not divisible by 3")
            }
            Self::UnknownFilterType(filter) => writeln!(f, "Unknown filter {filter}"),
            Self::BadTileRequest(x, y) => {
                writeln!(f, "Requested tile ({x},{y}) but the image is a single tile")
            }
            Self::BadHeaderLength(length) => {
                writeln!(f, "Bad IHDR length {length}, expected 13")
            }
            Self::MissingHeader => writeln!(f, "First chunk not IHDR, corrupt PNG"),
            Self::ZeroDimensions => writeln!(f, "Width or height cannot be zero"),
            Self::TooLargeDimensions(dimension, found, max) => {
                writeln!(
                    f,
                    "Image {dimension} {found}, larger than maximum configured {dimension} {max}, aborting"
                )
            }
            Self::ZlibDecodeErrors(err) => writeln!(f, "Error decoding idat chunks {err:?}"),
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::GenericStatic(val) => writeln!(f, "{val}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<std::io::Error> for PngDecodeErrors {
    fn from(val: std::io::Error) -> Self {
        Self::IoError(val)
    }
}

impl From<zune_inflate::errors::InflateDecodeErrors> for PngDecodeErrors {
    fn from(val: zune_inflate::errors::InflateDecodeErrors) -> Self {
        Self::ZlibDecodeErrors(val)
    }
}
