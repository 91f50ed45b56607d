/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Destination sample buffer
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

/// How samples are arranged inside a row
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SampleLayout {
    /// Single band samples narrower than a byte, packed most significant
    /// bits first, rows start on a byte boundary
    Packed,
    /// One storage element per sample, bands of a pixel next to each other
    Interleaved
}

impl SampleLayout {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Packed => "packed",
            Self::Interleaved => "interleaved"
        }
    }
}

/// Sample storage, bytes up to 8 bit depths and words for 16
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RasterData {
    U8(Vec<u8>),
    U16(Vec<u16>)
}

/// How callers should interpret samples
#[derive(Clone, Debug, PartialEq)]
pub enum ColorModel {
    /// Samples are indices into a palette
    Indexed {
        bits:  u8,
        red:   Vec<u8>,
        green: Vec<u8>,
        blue:  Vec<u8>,
        alpha: Option<Vec<u8>>
    },
    /// Samples are colour components
    Component {
        color_space: ColorSpace,
        depth:       BitDepth,
        has_alpha:   bool
    }
}

impl ColorModel {
    /// Component model for a band count, 1 to 4 bands map to
    /// luma, luma + alpha, RGB and RGBA
    pub fn component(bands: usize, depth: u8) -> ColorModel {
        let color_space = match bands {
            1 => ColorSpace::Luma,
            2 => ColorSpace::LumaA,
            3 => ColorSpace::RGB,
            _ => ColorSpace::RGBA
        };
        let depth = if depth == 16 {
            BitDepth::Sixteen
        } else {
            BitDepth::Eight
        };
        ColorModel::Component {
            color_space,
            depth,
            has_alpha: matches!(bands, 2 | 4)
        }
    }
}

/// Anything that can hand out decoded samples and their meaning
pub trait RasterSource {
    /// The decoded samples and their layout
    fn buffer(&self) -> &Raster;
    /// How samples map to colours
    fn color_model(&self) -> &ColorModel;
}

/// A width x height image with `bands` samples per pixel
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster {
    width:  usize,
    height: usize,
    bands:  usize,
    depth:  u8,
    layout: SampleLayout,
    // storage elements per row
    stride: usize,
    data:   RasterData
}

impl Raster {
    /// Allocate a zeroed raster
    pub fn new(width: usize, height: usize, bands: usize, depth: u8) -> Raster {
        let bytes_per_row = (bands * width * usize::from(depth) + 7) / 8;

        let layout = if bands == 1 && depth < 8 {
            SampleLayout::Packed
        } else {
            SampleLayout::Interleaved
        };

        let (stride, data) = if depth == 16 {
            let stride = bytes_per_row / 2;
            (stride, RasterData::U16(vec![0; stride * height]))
        } else {
            (bytes_per_row, RasterData::U8(vec![0; bytes_per_row * height]))
        };

        Raster {
            width,
            height,
            bands,
            depth,
            layout,
            stride,
            data
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn bands(&self) -> usize {
        self.bands
    }

    pub const fn depth(&self) -> u8 {
        self.depth
    }

    pub const fn layout(&self) -> SampleLayout {
        self.layout
    }

    /// Storage elements (bytes or words) per row
    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn data(&self) -> &RasterData {
        &self.data
    }

    pub fn into_data(self) -> RasterData {
        self.data
    }

    /// Write the `bands` samples of pixel `(x, y)`
    ///
    /// Samples must fit in the raster's bit depth.
    pub fn set_pixel(&mut self, x: usize, y: usize, samples: &[u16]) {
        let row_start = y * self.stride;

        match (&mut self.data, self.layout) {
            (RasterData::U8(data), SampleLayout::Packed) => {
                let depth = usize::from(self.depth);
                let bit = x * depth;
                let shift = 8 - depth - (bit & 7);
                let mask = ((1_u16 << depth) - 1) as u8;

                let byte = &mut data[row_start + (bit >> 3)];

                *byte &= !(mask << shift);
                *byte |= ((samples[0] as u8) & mask) << shift;
            }
            (RasterData::U8(data), SampleLayout::Interleaved) => {
                let start = row_start + x * self.bands;

                for (out, sample) in data[start..start + self.bands].iter_mut().zip(samples) {
                    *out = *sample as u8;
                }
            }
            (RasterData::U16(data), _) => {
                let start = row_start + x * self.bands;

                data[start..start + self.bands].copy_from_slice(&samples[..self.bands]);
            }
        }
    }

    /// Read the samples of pixel `(x, y)` into `samples`
    pub fn get_pixel(&self, x: usize, y: usize, samples: &mut [u16]) {
        let row_start = y * self.stride;

        match (&self.data, self.layout) {
            (RasterData::U8(data), SampleLayout::Packed) => {
                let depth = usize::from(self.depth);
                let bit = x * depth;
                let shift = 8 - depth - (bit & 7);
                let mask = (1_u16 << depth) - 1;

                samples[0] = (u16::from(data[row_start + (bit >> 3)]) >> shift) & mask;
            }
            (RasterData::U8(data), SampleLayout::Interleaved) => {
                let start = row_start + x * self.bands;

                for (out, sample) in samples.iter_mut().zip(&data[start..start + self.bands]) {
                    *out = u16::from(*sample);
                }
            }
            (RasterData::U16(data), _) => {
                let start = row_start + x * self.bands;

                samples[..self.bands].copy_from_slice(&data[start..start + self.bands]);
            }
        }
    }

    /// Samples as bytes, 16 bit samples in native endian
    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            RasterData::U8(data) => data,
            RasterData::U16(data) => bytemuck::cast_slice(data)
        }
    }

    /// Samples as bytes, 16 bit samples in big endian like the png stream
    pub fn to_be_bytes(&self) -> Vec<u8> {
        match &self.data {
            RasterData::U8(data) => data.clone(),
            RasterData::U16(data) => data.iter().flat_map(|x| x.to_be_bytes()).collect()
        }
    }
}
