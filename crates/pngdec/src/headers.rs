/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk handlers
//!
//! Each handler parses one chunk and records what it found in the
//! [`DecodeContext`], the property map and, when requested, the encode
//! parameters.
use chrono::NaiveDate;
use log::{trace, warn};
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::chunk::PngChunk;
use crate::constants::{CHROMATICITY_KEYS, DEPTH_SCALE_TABLE};
use crate::decoder::DecodeContext;
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::header::ImageHeader;
use crate::post_process::{PostProcess, Transparency};
use crate::properties::{EncodeParams, EncodeParamsKind, PropertyValue, TextChunk};

/// Decode latin1 bytes, every byte is its own code point
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|x| char::from(*x)).collect()
}

/// Split a chunk at the first NUL returning the keyword and the remainder
fn split_keyword<'a>(
    data: &'a [u8], what: &'static str
) -> Result<(String, &'a [u8]), PngDecodeErrors> {
    let end = data
        .iter()
        .position(|x| *x == 0)
        .ok_or(PngDecodeErrors::Truncated(what))?;

    Ok((latin1(&data[..end]), &data[end + 1..]))
}

impl DecodeContext {
    fn require_header(&self) -> Result<ImageHeader, PngDecodeErrors> {
        self.header.ok_or(PngDecodeErrors::MissingHeader)
    }

    pub(crate) fn parse_ihdr(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        if self.header.is_some() {
            return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
        }
        let header = ImageHeader::parse(chunk, &self.options)?;
        let correcting = self.options.get_perform_gamma_correction();

        self.properties
            .insert("color_type", PropertyValue::Str(header.color.name().to_string()));
        self.properties
            .insert("bit_depth", PropertyValue::Int(i64::from(header.depth)));
        self.properties.insert(
            "interlace_method",
            PropertyValue::Str(header.interlace_method.name().to_string())
        );

        if self.options.get_generate_encode_params() {
            let kind = match header.color {
                PngColor::Palette => EncodeParamsKind::Palette {
                    background_index: None
                },
                PngColor::Luma | PngColor::LumaA => EncodeParamsKind::Gray {
                    background_gray:  None,
                    transparent_gray: None
                },
                PngColor::RGB | PngColor::RGBA => EncodeParamsKind::Rgb {
                    background_rgb:  None,
                    transparent_rgb: None
                }
            };
            self.encode_params = Some(EncodeParams::new(
                kind,
                header.depth,
                header.interlace_method == InterlaceMethod::Adam7
            ));
        }

        if correcting {
            // until a gAMA chunk says otherwise the file is assumed to be 1/2.2
            let gamma = self.gamma.default_reported_gamma();

            self.properties.insert("gamma", PropertyValue::Float(gamma));

            if let Some(params) = &mut self.encode_params {
                params.gamma = Some(gamma);
            }
        }

        self.process = Some(PostProcess::select(&header, &self.options, None));
        self.header = Some(header);

        Ok(())
    }

    pub(crate) fn parse_plte(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        if chunk.length % 3 != 0 {
            return Err(PngDecodeErrors::InvalidPaletteLength(chunk.length));
        }
        // gAMA comes before PLTE, so the file gamma is final here
        let lut = if self.options.get_perform_gamma_correction() {
            Some(self.gamma.build_lut(8))
        } else {
            None
        };

        let palette = chunk
            .data
            .chunks_exact(3)
            .map(|entry| match &lut {
                Some(lut) => [
                    lut[usize::from(entry[0])] as u8,
                    lut[usize::from(entry[1])] as u8,
                    lut[usize::from(entry[2])] as u8
                ],
                None => [entry[0], entry[1], entry[2]]
            })
            .collect();

        self.palette = Some(palette);

        Ok(())
    }

    pub(crate) fn parse_bkgd(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let header = self.require_header()?;

        let color = match header.color {
            PngColor::Palette => {
                let palette = self
                    .palette
                    .as_ref()
                    .ok_or(PngDecodeErrors::MissingPalette("bKGD"))?;

                let index = chunk.get_u8(0)?;
                let entry = palette.get(usize::from(index)).ok_or_else(|| {
                    PngDecodeErrors::Generic(format!(
                        "bKGD palette index {} out of range for {} entries",
                        index,
                        palette.len()
                    ))
                })?;

                if let Some(params) = &mut self.encode_params {
                    if let EncodeParamsKind::Palette { background_index } = &mut params.kind {
                        *background_index = Some(index);
                    }
                }
                *entry
            }
            PngColor::Luma | PngColor::LumaA => {
                let gray = chunk.get_u16_be(0)?;

                if let Some(params) = &mut self.encode_params {
                    if let EncodeParamsKind::Gray { background_gray, .. } = &mut params.kind {
                        *background_gray = Some(gray);
                    }
                }
                let value = scale_to_8bit(gray, header.depth);
                [value; 3]
            }
            PngColor::RGB | PngColor::RGBA => {
                let rgb = [
                    chunk.get_u16_be(0)?,
                    chunk.get_u16_be(2)?,
                    chunk.get_u16_be(4)?
                ];
                if let Some(params) = &mut self.encode_params {
                    if let EncodeParamsKind::Rgb { background_rgb, .. } = &mut params.kind {
                        *background_rgb = Some(rgb);
                    }
                }
                rgb.map(|x| scale_to_8bit(x, header.depth))
            }
        };
        self.properties
            .insert("background_color", PropertyValue::Color(color));

        Ok(())
    }

    fn insert_chromaticity(&mut self, chromaticity: [f32; 8]) {
        for (key, value) in CHROMATICITY_KEYS.iter().zip(chromaticity) {
            self.properties.insert(key, PropertyValue::Float(value));
        }
        if let Some(params) = &mut self.encode_params {
            params.chromaticity = Some(chromaticity);
        }
    }

    fn insert_gamma(&mut self) {
        let gamma = self
            .gamma
            .reported_gamma(self.options.get_perform_gamma_correction());

        self.properties.insert("gamma", PropertyValue::Float(gamma));

        if let Some(params) = &mut self.encode_params {
            params.gamma = Some(gamma);
        }
    }

    pub(crate) fn parse_chrm(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        if self.gamma.srgb_intent.is_some() {
            warn!("Ignoring cHRM chunk after sRGB chunk");
            return Ok(());
        }
        let mut chromaticity = [0.0; 8];

        for (i, value) in chromaticity.iter_mut().enumerate() {
            *value = chunk.get_u32_be(i * 4)? as f32 / 100000.0;
        }
        self.gamma.chromaticity = Some(chromaticity);
        self.insert_chromaticity(chromaticity);

        Ok(())
    }

    pub(crate) fn parse_gama(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        if self.gamma.srgb_intent.is_some() {
            warn!("Ignoring gAMA chunk after sRGB chunk");
            return Ok(());
        }
        self.gamma.file_gamma = chunk.get_u32_be(0)? as f32 / 100000.0;
        self.insert_gamma();

        Ok(())
    }

    pub(crate) fn parse_srgb(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        if self.gamma.srgb_intent.is_some() {
            warn!("Ignoring repeated sRGB chunk");
            return Ok(());
        }
        let intent = chunk.get_u8(0)?;

        self.gamma.set_srgb(intent);

        self.properties
            .insert("rendering_intent", PropertyValue::Int(i64::from(intent)));
        // gamma and chromaticity are reported even when correction is off
        self.insert_gamma();

        if let Some(chromaticity) = self.gamma.chromaticity {
            self.insert_chromaticity(chromaticity);
        }
        Ok(())
    }

    pub(crate) fn parse_hist(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let entries = self
            .palette
            .as_ref()
            .ok_or(PngDecodeErrors::MissingPalette("hIST"))?
            .len();

        let histogram = (0..entries)
            .map(|i| chunk.get_u16_be(i * 2))
            .collect::<Result<Vec<u16>, PngDecodeErrors>>()?;

        self.properties.insert(
            "palette_histogram",
            PropertyValue::IntArray(histogram.iter().map(|x| u32::from(*x)).collect())
        );
        if let Some(params) = &mut self.encode_params {
            params.palette_histogram = Some(histogram);
        }
        Ok(())
    }

    pub(crate) fn parse_iccp(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let (name, _) = split_keyword(&chunk.data, "iCCP profile name")?;

        trace!("ICC profile: {}", name);

        self.properties
            .insert("icc_profile_name", PropertyValue::Str(name));

        Ok(())
    }

    pub(crate) fn parse_phys(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let x_pixels = chunk.get_u32_be(0)?;
        let y_pixels = chunk.get_u32_be(4)?;
        let unit = chunk.get_u8(8)?;

        if unit > 1 {
            return Err(PngDecodeErrors::InvalidUnitSpecifier(unit));
        }

        self.properties
            .insert("x_pixels_per_unit", PropertyValue::Int(i64::from(x_pixels)));
        self.properties
            .insert("y_pixels_per_unit", PropertyValue::Int(i64::from(y_pixels)));
        self.properties.insert(
            "pixel_aspect_ratio",
            PropertyValue::Float(x_pixels as f32 / y_pixels as f32)
        );
        if unit == 1 {
            self.properties
                .insert("pixel_units", PropertyValue::Str("Meters".to_string()));
        }
        if let Some(params) = &mut self.encode_params {
            params.physical_dimension = Some((x_pixels, y_pixels, unit));
        }
        Ok(())
    }

    pub(crate) fn parse_sbit(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let header = self.require_header()?;

        let (count, max) = if header.color == PngColor::Palette {
            (3, 8)
        } else {
            (header.input_bands(), header.depth)
        };

        let mut bits = Vec::with_capacity(count);

        for i in 0..count {
            let value = chunk.get_u8(i)?;

            if value == 0 || value > max {
                return Err(PngDecodeErrors::InvalidSignificantBits(value, max));
            }
            bits.push(value);
        }
        self.properties.insert(
            "significant_bits",
            PropertyValue::IntArray(bits.iter().map(|x| u32::from(*x)).collect())
        );
        if let Some(params) = &mut self.encode_params {
            params.significant_bits = Some(bits.clone());
        }
        self.significant_bits = Some(bits);

        Ok(())
    }

    pub(crate) fn parse_trns(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let header = self.require_header()?;
        let suppress_alpha = self.options.get_suppress_alpha();

        let transparency = match header.color {
            PngColor::Palette => {
                let palette_len = self
                    .palette
                    .as_ref()
                    .ok_or(PngDecodeErrors::MissingPalette("tRNS"))?
                    .len();

                if chunk.length > palette_len {
                    return Err(PngDecodeErrors::TransparencyExceedsPalette {
                        entries: chunk.length,
                        palette: palette_len
                    });
                }
                let mut alpha = chunk.data.clone();
                alpha.resize(palette_len, 255);

                Transparency::PaletteAlpha(alpha)
            }
            PngColor::Luma => {
                let key = chunk.get_u16_be(0)?;

                if !suppress_alpha {
                    if let Some(params) = &mut self.encode_params {
                        if let EncodeParamsKind::Gray { transparent_gray, .. } = &mut params.kind {
                            *transparent_gray = Some(key);
                        }
                    }
                }
                Transparency::GrayKey(key)
            }
            PngColor::RGB => {
                let key = [
                    chunk.get_u16_be(0)?,
                    chunk.get_u16_be(2)?,
                    chunk.get_u16_be(4)?
                ];
                if !suppress_alpha {
                    if let Some(params) = &mut self.encode_params {
                        if let EncodeParamsKind::Rgb { transparent_rgb, .. } = &mut params.kind {
                            *transparent_rgb = Some(key);
                        }
                    }
                }
                Transparency::RgbKey(key[0], key[1], key[2])
            }
            PngColor::LumaA | PngColor::RGBA => {
                return Err(PngDecodeErrors::UnexpectedTransparencyChunk(header.color));
            }
        };

        self.process = Some(PostProcess::select(
            &header,
            &self.options,
            Some(&transparency)
        ));
        self.transparency = Some(transparency);

        Ok(())
    }

    pub(crate) fn parse_text(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let (keyword, text) = split_keyword(&chunk.data, "tEXt keyword")?;

        self.text.push(TextChunk {
            keyword,
            text: latin1(text)
        });
        Ok(())
    }

    pub(crate) fn parse_ztxt(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let (keyword, rest) = split_keyword(&chunk.data, "zTXt keyword")?;

        // compression method, zero is the only one defined
        let compressed = rest
            .get(1..)
            .ok_or(PngDecodeErrors::Truncated("zTXt compression method"))?;

        let mut decoder = DeflateDecoder::new_with_options(compressed, DeflateOptions::default());

        match decoder.decode_zlib() {
            Ok(text) => self.ztext.push(TextChunk {
                keyword,
                text: latin1(&text)
            }),
            Err(e) => warn!("Could not inflate zTXt chunk {:?}: {:?}", keyword, e)
        }
        Ok(())
    }

    pub(crate) fn parse_time(&mut self, chunk: &PngChunk) -> Result<(), PngDecodeErrors> {
        let year = chunk.get_u16_be(0)?;
        let month = chunk.get_u8(2)?;
        let day = chunk.get_u8(3)?;
        let hour = chunk.get_u8(4)?;
        let minute = chunk.get_u8(5)?;
        let second = chunk.get_u8(6)?;

        // months are stored one based, like chrono expects
        let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .and_then(|date| {
                date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
            })
            .map(|date| date.and_utc());

        match date {
            Some(date) => {
                self.properties.insert("timestamp", PropertyValue::Date(date));

                if let Some(params) = &mut self.encode_params {
                    params.modification_time = Some(date);
                }
            }
            None => warn!(
                "Ignoring invalid tIME {}-{}-{} {}:{}:{}",
                year, month, day, hour, minute, second
            )
        }
        Ok(())
    }

    /// Keep an unrecognised chunk as a property
    pub(crate) fn parse_unknown(&mut self, chunk: PngChunk) {
        let key = format!("chunk_{}:{}", self.chunk_index, chunk.name());
        self.chunk_index += 1;

        trace!("Storing unknown chunk {} as {}", chunk.name(), key);

        if let Some(params) = &mut self.encode_params {
            params.private_chunks.push((chunk.chunk, chunk.data.clone()));
        }
        self.properties
            .insert(&key, PropertyValue::Bytes(chunk.data));
    }

    /// Publish everything only known once all chunks are read
    pub(crate) fn parse_iend(&mut self) -> Result<(), PngDecodeErrors> {
        let header = self.require_header()?;

        for (i, text) in self.text.iter().enumerate() {
            self.properties.insert(
                &format!("text_{}:{}", i, text.keyword),
                PropertyValue::Str(text.text.clone())
            );
        }
        for (i, text) in self.ztext.iter().enumerate() {
            self.properties.insert(
                &format!("ztext_{}:{}", i, text.keyword),
                PropertyValue::Str(text.text.clone())
            );
        }
        if let Some(params) = &mut self.encode_params {
            params.text = self.text.clone();
            params.compressed_text = self.ztext.clone();
        }

        if self.significant_bits.is_none() {
            let bits = vec![header.depth; header.input_bands()];

            self.properties.insert(
                "significant_bits",
                PropertyValue::IntArray(bits.iter().map(|x| u32::from(*x)).collect())
            );
            self.significant_bits = Some(bits);
        }
        Ok(())
    }
}

/// Scale a sample of `depth` bits to 8 bits for reporting
fn scale_to_8bit(value: u16, depth: u8) -> u8 {
    match depth {
        16 => (value >> 8) as u8,
        8 => value as u8,
        _ => {
            let max = (1_u16 << depth) - 1;
            (value & max) as u8 * DEPTH_SCALE_TABLE[usize::from(depth)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{latin1, scale_to_8bit, split_keyword};

    #[test]
    fn background_scaling() {
        assert_eq!(scale_to_8bit(1, 1), 0xff);
        assert_eq!(scale_to_8bit(2, 2), 0xaa);
        assert_eq!(scale_to_8bit(3, 4), 0x33);
        assert_eq!(scale_to_8bit(200, 8), 200);
        assert_eq!(scale_to_8bit(0xABCD, 16), 0xAB);
    }

    #[test]
    fn keyword_split() {
        let (key, rest) = split_keyword(b"Title\0caf\xe9", "test").unwrap();
        assert_eq!(key, "Title");
        assert_eq!(latin1(rest), "caf\u{e9}");

        assert!(split_keyword(b"no terminator", "test").is_err());
    }
}
