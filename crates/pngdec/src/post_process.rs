/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Turning decoded samples into output samples
//!
//! Once all chunks before the image data are known, a [`PostProcess`]
//! is selected from the colour type, the decode options and the tRNS chunk.
//! Every unpacked input pixel then goes through
//! [`PostProcessPipeline::process_pixel`] which may look it up in the
//! palette, push it through a gamma or gray table, add an alpha channel
//! derived from the transparency key or drop an existing one.
use log::info;

use crate::enums::PngColor;
use crate::header::ImageHeader;
use crate::options::DecodeOptions;

/// Contents of a tRNS chunk
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transparency {
    /// Gray sample value that is fully transparent
    GrayKey(u16),
    /// RGB sample values that are fully transparent
    RgbKey(u16, u16, u16),
    /// One alpha byte per palette entry, entries past the chunk are 255
    PaletteAlpha(Vec<u8>)
}

/// Transform applied to every pixel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PostProcessMode {
    /// Copy samples
    None,
    /// Gamma correct colour samples
    GammaOnly,
    /// Push sub 8 bit gray samples through the gray table
    GrayLutExpand,
    /// Push sub 8 bit gray samples through the gray table and add alpha
    GrayLutExpandAddTransparency,
    /// Replace palette indices by their RGB entry
    PaletteToRgb,
    /// Replace palette indices by their RGBA entry
    PaletteToRgba,
    /// Add alpha to gray samples from the transparency key
    AddGrayTransparency,
    /// Add alpha to RGB samples from the transparency key
    AddRgbTransparency,
    /// Drop the alpha sample of gray + alpha images
    RemoveGrayTransparency,
    /// Drop the alpha sample of RGBA images
    RemoveRgbTransparency
}

/// The selected transform and the output it produces
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PostProcess {
    pub mode:                     PostProcessMode,
    /// Write gray as gray, gray, gray before alpha
    pub replicate_to_rgb:         bool,
    pub output_bands:             usize,
    /// Sub 8 bit gray is promoted to 8 bits
    pub output_8bit_gray:         bool,
    /// An unexpanded palette carries alpha entries
    pub output_has_alpha_palette: bool,
    /// Alpha written for samples not matching the transparency key
    pub max_opacity:              u16
}

impl PostProcess {
    /// Select the transform for an image
    ///
    /// `transparency` is the content of the tRNS chunk if one was seen,
    /// it is ignored when alpha is suppressed.
    pub fn select(
        header: &ImageHeader, options: &DecodeOptions, transparency: Option<&Transparency>
    ) -> PostProcess {
        let gamma = options.get_perform_gamma_correction();
        let expand_gray_alpha = options.get_expand_gray_alpha();
        let low_depth = header.depth < 8;

        let transparency = if options.get_suppress_alpha() {
            None
        } else {
            transparency
        };

        let mut process = PostProcess {
            mode:                     PostProcessMode::None,
            replicate_to_rgb:         false,
            output_bands:             header.input_bands(),
            output_8bit_gray:         options.get_output_8bit_gray(),
            output_has_alpha_palette: false,
            max_opacity:              header.max_sample()
        };

        let plain = if gamma {
            PostProcessMode::GammaOnly
        } else {
            PostProcessMode::None
        };

        match header.color {
            PngColor::Luma => {
                if let Some(Transparency::GrayKey(_)) = transparency {
                    if low_depth {
                        process.output_8bit_gray = true;
                        process.max_opacity = 255;
                        process.mode = PostProcessMode::GrayLutExpandAddTransparency;
                    } else {
                        process.mode = PostProcessMode::AddGrayTransparency;
                    }
                    process.set_gray_alpha_bands(expand_gray_alpha);
                } else if process.output_8bit_gray && low_depth {
                    process.mode = PostProcessMode::GrayLutExpand;
                } else {
                    process.mode = plain;
                }
            }
            PngColor::RGB => {
                if let Some(Transparency::RgbKey(..)) = transparency {
                    process.mode = PostProcessMode::AddRgbTransparency;
                    process.output_bands = 4;
                } else {
                    process.mode = plain;
                }
            }
            PngColor::Palette => {
                let has_alpha = matches!(transparency, Some(Transparency::PaletteAlpha(_)));

                if options.get_expand_palette() {
                    if has_alpha {
                        process.mode = PostProcessMode::PaletteToRgba;
                        process.output_bands = 4;
                    } else {
                        process.mode = PostProcessMode::PaletteToRgb;
                        process.output_bands = 3;
                    }
                } else {
                    process.output_has_alpha_palette = has_alpha;
                }
            }
            PngColor::LumaA => {
                if options.get_suppress_alpha() {
                    process.mode = PostProcessMode::RemoveGrayTransparency;
                    process.output_bands = 1;
                } else {
                    process.mode = plain;
                    process.set_gray_alpha_bands(expand_gray_alpha);
                }
            }
            PngColor::RGBA => {
                if options.get_suppress_alpha() {
                    process.mode = PostProcessMode::RemoveRgbTransparency;
                    process.output_bands = 3;
                } else {
                    process.mode = plain;
                }
            }
        }
        info!(
            "Post process: {:?}, replicate to rgb: {}, output bands: {}",
            process.mode, process.replicate_to_rgb, process.output_bands
        );
        process
    }

    fn set_gray_alpha_bands(&mut self, expand: bool) {
        if expand {
            self.replicate_to_rgb = true;
            self.output_bands = 4;
        } else {
            self.output_bands = 2;
        }
    }

    /// Bit depth of the output samples
    pub fn output_depth(&self, header: &ImageHeader, options: &DecodeOptions) -> u8 {
        match header.color {
            PngColor::Luma if header.depth < 8 && self.output_8bit_gray => 8,
            PngColor::Palette if options.get_expand_palette() => 8,
            _ => header.depth
        }
    }
}

/// Read sample `index` of a defiltered row
///
/// Samples narrower than a byte are stored most significant bits first,
/// 16 bit samples are big endian.
#[inline]
pub fn unpack_sample(row: &[u8], index: usize, depth: u8) -> u16 {
    match depth {
        16 => u16::from_be_bytes([row[index * 2], row[index * 2 + 1]]),
        8 => u16::from(row[index]),
        _ => {
            let depth = usize::from(depth);
            let bit = index * depth;
            let shift = 8 - depth - (bit & 7);
            let mask = (1_u16 << depth) - 1;

            (u16::from(row[bit >> 3]) >> shift) & mask
        }
    }
}

/// The selected transform plus every table it reads
///
/// Immutable once built, pixel decoding only borrows it.
pub struct PostProcessPipeline {
    process:     PostProcess,
    input_bands: usize,
    gamma_lut:   Option<Vec<u16>>,
    gray_lut:    Vec<u16>,
    palette:     Vec<[u8; 4]>,
    gray_key:    u16,
    rgb_key:     [u16; 3]
}

impl PostProcessPipeline {
    /// Bundle the transform with its tables
    ///
    /// `palette` holds RGBA entries, `gamma_lut` is indexed by raw
    /// samples and `gray_lut` maps sub 8 bit gray to 8 bits.
    pub fn new(
        process: PostProcess, input_bands: usize, gamma_lut: Option<Vec<u16>>, gray_lut: Vec<u16>,
        palette: Vec<[u8; 4]>, transparency: Option<&Transparency>
    ) -> PostProcessPipeline {
        let (gray_key, rgb_key) = match transparency {
            Some(Transparency::GrayKey(key)) => (*key, [0; 3]),
            Some(Transparency::RgbKey(r, g, b)) => (0, [*r, *g, *b]),
            _ => (0, [0; 3])
        };
        PostProcessPipeline {
            process,
            input_bands,
            gamma_lut,
            gray_lut,
            palette,
            gray_key,
            rgb_key
        }
    }

    pub const fn process(&self) -> &PostProcess {
        &self.process
    }

    #[inline(always)]
    fn gamma(&self, sample: u16) -> u16 {
        match &self.gamma_lut {
            Some(lut) => lut.get(usize::from(sample)).copied().unwrap_or(sample),
            None => sample
        }
    }

    #[inline(always)]
    fn gray(&self, sample: u16) -> u16 {
        self.gray_lut
            .get(usize::from(sample))
            .copied()
            .unwrap_or(sample)
    }

    #[inline(always)]
    fn palette_entry(&self, index: u16) -> [u8; 4] {
        // out of range indices read as opaque black
        self.palette
            .get(usize::from(index))
            .copied()
            .unwrap_or([0, 0, 0, 255])
    }

    fn write_gray_alpha(&self, value: u16, alpha: u16, output: &mut [u16]) {
        if self.process.replicate_to_rgb {
            output[0] = value;
            output[1] = value;
            output[2] = value;
            output[3] = alpha;
        } else {
            output[0] = value;
            output[1] = alpha;
        }
    }

    /// Map one input pixel to its output samples
    ///
    /// `input` holds the pixel's raw samples, `output` must hold
    /// `output_bands` samples.
    pub fn process_pixel(&self, input: &[u16], output: &mut [u16]) {
        let max_opacity = self.process.max_opacity;

        match self.process.mode {
            PostProcessMode::None => {
                if self.process.replicate_to_rgb {
                    self.write_gray_alpha(input[0], input[1], output);
                } else {
                    output[..self.input_bands].copy_from_slice(&input[..self.input_bands]);
                }
            }
            PostProcessMode::GammaOnly => match self.input_bands {
                2 => self.write_gray_alpha(self.gamma(input[0]), input[1], output),
                4 => {
                    for i in 0..3 {
                        output[i] = self.gamma(input[i]);
                    }
                    output[3] = input[3];
                }
                bands => {
                    for i in 0..bands {
                        output[i] = self.gamma(input[i]);
                    }
                }
            },
            PostProcessMode::GrayLutExpand => {
                output[0] = self.gray(input[0]);
            }
            PostProcessMode::GrayLutExpandAddTransparency => {
                let alpha = if input[0] == self.gray_key {
                    0
                } else {
                    max_opacity
                };
                self.write_gray_alpha(self.gray(input[0]), alpha, output);
            }
            PostProcessMode::PaletteToRgb => {
                let entry = self.palette_entry(input[0]);

                output[0] = u16::from(entry[0]);
                output[1] = u16::from(entry[1]);
                output[2] = u16::from(entry[2]);
            }
            PostProcessMode::PaletteToRgba => {
                let entry = self.palette_entry(input[0]);

                output[0] = u16::from(entry[0]);
                output[1] = u16::from(entry[1]);
                output[2] = u16::from(entry[2]);
                output[3] = u16::from(entry[3]);
            }
            PostProcessMode::AddGrayTransparency => {
                let alpha = if input[0] == self.gray_key {
                    0
                } else {
                    max_opacity
                };
                self.write_gray_alpha(self.gamma(input[0]), alpha, output);
            }
            PostProcessMode::AddRgbTransparency => {
                let alpha = if input[..3] == self.rgb_key {
                    0
                } else {
                    max_opacity
                };
                output[0] = self.gamma(input[0]);
                output[1] = self.gamma(input[1]);
                output[2] = self.gamma(input[2]);
                output[3] = alpha;
            }
            PostProcessMode::RemoveGrayTransparency => {
                output[0] = self.gamma(input[0]);
            }
            PostProcessMode::RemoveRgbTransparency => {
                output[0] = self.gamma(input[0]);
                output[1] = self.gamma(input[1]);
                output[2] = self.gamma(input[2]);
            }
        }
    }
}
