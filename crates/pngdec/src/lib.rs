/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png decoder
//!
//! Decodes every bit depth, colour type and interlace method of
//! ISO/IEC 15948:2003 (E) png images into a sample buffer plus a map of
//! properties describing the image (resolution, gamma, chromaticity,
//! text, timestamps and unknown chunks).
//!
//! # Features
//! - Optional gamma correction with user and display exponents
//! - Palette expansion to RGB or RGBA
//! - Transparency keys turned into alpha channels, or alpha dropped entirely
//! - Sub 8 bit gray promoted to 8 bits
//! - Gray + alpha expanded to gray, gray, gray, alpha
//!
//! # Usage
//!
//!```no_run
//! use pngdec::{DecodeOptions, PngDecoder};
//! use pngdec::zune_core::result::DecodingResult;
//!
//! let data = std::fs::read("image.png").unwrap();
//! let options = DecodeOptions::default().set_expand_palette(true);
//!
//! let mut decoder = PngDecoder::new_with_options(data.as_slice(), options);
//! let image = decoder.decode().unwrap();
//!
//! for (key, value) in image.properties() {
//!     println!("{key}: {value:?}");
//! }
//!
//! match image.into_decoding_result() {
//!    DecodingResult::U8(px) => {
//!        // images with 8 bits or less per sample
//!    }
//!    DecodingResult::U16(px) => {
//!        // images with 16 bits per sample
//!    }
//!    _ => unreachable!(),
//!}
//!```
//!
//! # Extracting metadata
//!
//! [`PngDecoder::decode_headers`] reads every chunk without touching
//! the image data, after which [`PngDecoder::get_properties`] and
//! [`PngDecoder::get_header`] describe the image.
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
#![allow(clippy::op_ref, clippy::identity_op)]

pub use decoder::{DecodedImage, PngDecoder};
pub use enums::{InterlaceMethod, PngColor};
pub use header::ImageHeader;
pub use options::DecodeOptions;
pub use post_process::{PostProcess, PostProcessMode, Transparency};
pub use properties::{EncodeParams, EncodeParamsKind, Properties, PropertyValue, TextChunk};
pub use raster::{ColorModel, Raster, RasterData, RasterSource, SampleLayout};
pub use zune_core;

mod chunk;
mod constants;
mod decoder;
mod enums;
pub mod error;
pub mod filters;
mod gamma;
mod header;
mod headers;
pub mod interlace;
mod options;
mod post_process;
mod properties;
mod raster;
