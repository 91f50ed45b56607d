/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk type according to table 5.3 of
/// the png spec, see https://www.w3.org/TR/2003/REC-PNG-20031110/
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    cHRM,
    gAMA,
    iCCP,
    sBIT,
    sRGB,
    bKGD,
    hIST,
    tRNS,
    pHYs,
    tIME,
    tEXt,
    zTXt,
    unkn
}

impl PngChunkType {
    pub const fn from_bytes(chunk: &[u8; 4]) -> PngChunkType {
        match chunk {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            b"cHRM" => Self::cHRM,
            b"gAMA" => Self::gAMA,
            b"iCCP" => Self::iCCP,
            b"sBIT" => Self::sBIT,
            b"sRGB" => Self::sRGB,
            b"bKGD" => Self::bKGD,
            b"hIST" => Self::hIST,
            b"tRNS" => Self::tRNS,
            b"pHYs" => Self::pHYs,
            b"tIME" => Self::tIME,
            b"tEXt" => Self::tEXt,
            b"zTXt" => Self::zTXt,
            _ => Self::unkn
        }
    }
}

/// Per scanline filter, stored as the first byte of every row
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterlaceMethod {
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }

    /// Name reported in the `interlace_method` property
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "None",
            Self::Adam7 => "Adam7"
        }
    }
}

/// Colour type of the encoded samples
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    RGB,
    Palette,
    LumaA,
    RGBA
}

impl PngColor {
    /// Number of samples stored per pixel in the encoded stream
    pub const fn num_components(self) -> u8 {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    pub const fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    /// Name reported in the `color_type` property
    pub const fn name(self) -> &'static str {
        match self {
            PngColor::Luma => "Grayscale",
            PngColor::RGB => "Truecolor",
            PngColor::Palette => "Index",
            PngColor::LumaA => "Grayscale with alpha",
            PngColor::RGBA => "Truecolor with alpha"
        }
    }

    /// Smallest bit depth the colour type allows
    pub(crate) const fn min_depth(self) -> u8 {
        match self {
            PngColor::Luma | PngColor::Palette => 1,
            PngColor::RGB | PngColor::LumaA | PngColor::RGBA => 8
        }
    }

    /// Largest bit depth the colour type allows
    pub(crate) const fn max_depth(self) -> u8 {
        match self {
            PngColor::Palette => 8,
            _ => 16
        }
    }
}
