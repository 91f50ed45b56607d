/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! IHDR interpretation
use log::info;

use crate::chunk::PngChunk;
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::options::DecodeOptions;

/// Image geometry and sample format from the IHDR chunk
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageHeader {
    pub width:              usize,
    pub height:             usize,
    pub depth:              u8,
    pub color:              PngColor,
    pub compression_method: u8,
    pub filter_method:      u8,
    pub interlace_method:   InterlaceMethod
}

impl ImageHeader {
    /// Parse and validate the 13 bytes of an IHDR chunk
    pub fn parse(chunk: &PngChunk, options: &DecodeOptions) -> Result<ImageHeader, PngDecodeErrors> {
        if chunk.length != 13 {
            return Err(PngDecodeErrors::BadHeaderLength(chunk.length));
        }
        let width = chunk.get_u32_be(0)? as usize;
        let height = chunk.get_u32_be(4)? as usize;

        if width == 0 || height == 0 {
            return Err(PngDecodeErrors::ZeroDimensions);
        }
        if width > options.get_max_width() {
            return Err(PngDecodeErrors::TooLargeDimensions(
                "width",
                width,
                options.get_max_width()
            ));
        }
        if height > options.get_max_height() {
            return Err(PngDecodeErrors::TooLargeDimensions(
                "height",
                height,
                options.get_max_height()
            ));
        }

        let depth = chunk.get_u8(8)?;

        if !matches!(depth, 1 | 2 | 4 | 8 | 16) {
            return Err(PngDecodeErrors::InvalidBitDepth(depth));
        }
        let color_int = chunk.get_u8(9)?;
        let color =
            PngColor::from_int(color_int).ok_or(PngDecodeErrors::InvalidColorType(color_int))?;

        validate_depth(depth, color)?;

        let compression_method = chunk.get_u8(10)?;

        if compression_method != 0 {
            return Err(PngDecodeErrors::UnsupportedCompression(compression_method));
        }
        let filter_method = chunk.get_u8(11)?;

        if filter_method != 0 {
            return Err(PngDecodeErrors::UnsupportedFilter(filter_method));
        }
        let interlace_int = chunk.get_u8(12)?;
        let interlace_method = InterlaceMethod::from_int(interlace_int)
            .ok_or(PngDecodeErrors::UnsupportedInterlace(interlace_int))?;

        info!("Width: {}", width);
        info!("Height: {}", height);
        info!("Color type: {:?}", color);
        info!("Depth: {:?}", depth);
        info!("Interlace :{:?}", interlace_method);

        Ok(ImageHeader {
            width,
            height,
            depth,
            color,
            compression_method,
            filter_method,
            interlace_method
        })
    }

    /// Number of samples per pixel in the encoded stream
    pub const fn input_bands(&self) -> usize {
        self.color.num_components() as usize
    }

    /// Bytes a whole pixel occupies, never less than one
    ///
    /// This is the distance to the byte the Sub, Average and Paeth
    /// filters predict from.
    pub const fn bytes_per_pixel(&self) -> usize {
        let bytes = self.input_bands() * self.depth as usize / 8;

        if bytes == 0 {
            1
        } else {
            bytes
        }
    }

    /// Bytes in one scanline of `width` pixels, excluding the filter byte
    pub const fn row_bytes(&self, width: usize) -> usize {
        (self.input_bands() * width * self.depth as usize + 7) / 8
    }

    /// Largest sample value for the bit depth
    pub const fn max_sample(&self) -> u16 {
        ((1_u32 << self.depth) - 1) as u16
    }
}

/// Confirm a bit depth is legal for a colour type
///
/// Gray and palette images allow 1, 2, 4, 8 (and 16 for gray), everything
/// else needs 8 or 16.
pub fn validate_depth(depth: u8, color: PngColor) -> Result<(), PngDecodeErrors> {
    if !matches!(depth, 1 | 2 | 4 | 8 | 16) {
        return Err(PngDecodeErrors::InvalidBitDepth(depth));
    }
    if depth < color.min_depth() || depth > color.max_depth() {
        return Err(PngDecodeErrors::InvalidBitDepthForColorType(depth, color));
    }
    Ok(())
}
