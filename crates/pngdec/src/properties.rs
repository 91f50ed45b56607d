/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image properties and encode parameters gathered while decoding
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A single property value
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f32),
    Bytes(Vec<u8>),
    IntArray(Vec<u32>),
    /// 8 bit RGB colour
    Color([u8; 3]),
    Date(DateTime<Utc>)
}

/// Properties keyed by lower case names
///
/// Keys are lower cased on insertion, so `text_0:Title` is stored as
/// `text_0:title`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    map: BTreeMap<String, PropertyValue>
}

impl Properties {
    pub fn new() -> Properties {
        Properties::default()
    }

    /// Insert a property replacing an earlier value with the same key
    pub fn insert(&mut self, key: &str, value: PropertyValue) {
        self.map.insert(key.to_lowercase(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.map.get(&key.to_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> Iter<'_, String, PropertyValue> {
        self.map.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, PropertyValue> {
        self.map
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

/// A keyword and its text from a tEXt or zTXt chunk
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextChunk {
    pub keyword: String,
    pub text:    String
}

/// Colour type specific encode parameters
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EncodeParamsKind {
    Palette {
        background_index: Option<u8>
    },
    /// Gray and gray + alpha images
    Gray {
        background_gray:  Option<u16>,
        transparent_gray: Option<u16>
    },
    /// RGB and RGBA images
    Rgb {
        background_rgb:  Option<[u16; 3]>,
        transparent_rgb: Option<[u16; 3]>
    }
}

/// Parameters that would reproduce the file when encoding
///
/// Only built when requested via
/// [`DecodeOptions::set_generate_encode_params`](crate::DecodeOptions::set_generate_encode_params).
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeParams {
    pub kind:               EncodeParamsKind,
    pub bit_depth:          u8,
    pub interlacing:        bool,
    pub gamma:              Option<f32>,
    pub chromaticity:       Option<[f32; 8]>,
    pub significant_bits:   Option<Vec<u8>>,
    /// x and y pixels per unit and the unit specifier
    pub physical_dimension: Option<(u32, u32, u8)>,
    pub palette_histogram:  Option<Vec<u16>>,
    pub modification_time:  Option<DateTime<Utc>>,
    pub text:               Vec<TextChunk>,
    pub compressed_text:    Vec<TextChunk>,
    /// Unrecognised chunks, type and data
    pub private_chunks:     Vec<([u8; 4], Vec<u8>)>
}

impl EncodeParams {
    pub fn new(kind: EncodeParamsKind, bit_depth: u8, interlacing: bool) -> EncodeParams {
        EncodeParams {
            kind,
            bit_depth,
            interlacing,
            gamma: None,
            chromaticity: None,
            significant_bits: None,
            physical_dimension: None,
            palette_histogram: None,
            modification_time: None,
            text: Vec::new(),
            compressed_text: Vec::new(),
            private_chunks: Vec::new()
        }
    }
}
