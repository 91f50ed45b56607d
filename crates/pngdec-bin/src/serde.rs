/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;

use pngdec::zune_core::bit_depth::BitDepth;
use pngdec::{ColorModel, DecodedImage, EncodeParams, Properties, PropertyValue, TextChunk};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Json view of a decoded image, samples excluded
pub struct ImageSummary<'a> {
    file:  &'a OsStr,
    image: &'a DecodedImage
}

impl<'a> ImageSummary<'a> {
    pub fn new(file: &'a OsStr, image: &'a DecodedImage) -> ImageSummary<'a> {
        ImageSummary { file, image }
    }
}

impl<'a> Serialize for ImageSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let image = self.image;
        let mut state = serializer.serialize_struct("Image", 9)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("width", &image.width())?;
        state.serialize_field("height", &image.height())?;
        state.serialize_field("bands", &image.bands())?;
        state.serialize_field("depth", &image.depth())?;
        state.serialize_field("layout", image.raster().layout().name())?;
        state.serialize_field("color_model", &ColorModelSummary(image.color_model()))?;
        state.serialize_field("properties", &PropertiesSummary(image.properties()))?;
        state.serialize_field("encode_params", &image.encode_params().map(EncodeSummary))?;

        state.end()
    }
}

struct ColorModelSummary<'a>(&'a ColorModel);

impl<'a> Serialize for ColorModelSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self.0 {
            ColorModel::Indexed {
                bits,
                red,
                green,
                blue,
                alpha
            } => {
                let mut state = serializer.serialize_struct("Indexed", 6)?;

                state.serialize_field("kind", "indexed")?;
                state.serialize_field("bits", bits)?;
                state.serialize_field("red", red)?;
                state.serialize_field("green", green)?;
                state.serialize_field("blue", blue)?;
                state.serialize_field("alpha", alpha)?;
                state.end()
            }
            ColorModel::Component {
                color_space,
                depth,
                has_alpha
            } => {
                let bits: u8 = match depth {
                    BitDepth::Sixteen => 16,
                    _ => 8
                };
                let mut state = serializer.serialize_struct("Component", 4)?;

                state.serialize_field("kind", "component")?;
                state.serialize_field("color_space", &format!("{color_space:?}"))?;
                state.serialize_field("depth", &bits)?;
                state.serialize_field("has_alpha", has_alpha)?;
                state.end()
            }
        }
    }
}

struct PropertiesSummary<'a>(&'a Properties);

impl<'a> Serialize for PropertiesSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (key, value) in self.0 {
            map.serialize_entry(key, &ValueSummary(value))?;
        }
        map.end()
    }
}

struct ValueSummary<'a>(&'a PropertyValue);

impl<'a> Serialize for ValueSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self.0 {
            PropertyValue::Str(value) => serializer.serialize_str(value),
            PropertyValue::Int(value) => serializer.serialize_i64(*value),
            PropertyValue::Float(value) => serializer.serialize_f32(*value),
            PropertyValue::Bytes(value) => serializer.collect_seq(value),
            PropertyValue::IntArray(value) => serializer.collect_seq(value),
            PropertyValue::Color(value) => serializer.collect_seq(value),
            PropertyValue::Date(value) => serializer.serialize_str(&value.to_rfc3339())
        }
    }
}

struct TextSummary<'a>(&'a [TextChunk]);

impl<'a> Serialize for TextSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.collect_seq(self.0.iter().map(|x| [&x.keyword, &x.text]))
    }
}

struct EncodeSummary<'a>(&'a EncodeParams);

impl<'a> Serialize for EncodeSummary<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let params = self.0;
        let mut state = serializer.serialize_struct("EncodeParams", 12)?;

        state.serialize_field("kind", &format!("{:?}", params.kind))?;
        state.serialize_field("bit_depth", &params.bit_depth)?;
        state.serialize_field("interlacing", &params.interlacing)?;
        state.serialize_field("gamma", &params.gamma)?;
        state.serialize_field("chromaticity", &params.chromaticity)?;
        state.serialize_field("significant_bits", &params.significant_bits)?;
        state.serialize_field("physical_dimension", &params.physical_dimension)?;
        state.serialize_field("palette_histogram", &params.palette_histogram)?;
        state.serialize_field(
            "modification_time",
            &params.modification_time.map(|x| x.to_rfc3339())
        )?;
        state.serialize_field("text", &TextSummary(&params.text))?;
        state.serialize_field("compressed_text", &TextSummary(&params.compressed_text))?;
        state.serialize_field(
            "private_chunks",
            &params
                .private_chunks
                .iter()
                .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
                .collect::<Vec<String>>()
        )?;
        state.end()
    }
}
