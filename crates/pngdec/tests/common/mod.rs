/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers to build png streams in memory
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use png::Transformations;
use pngdec::{DecodeOptions, DecodedImage, PngDecoder};

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub const GRAY: u8 = 0;
pub const RGB: u8 = 2;
pub const PALETTE: u8 = 3;
pub const GRAY_ALPHA: u8 = 4;
pub const RGBA: u8 = 6;

/// Deterministic byte generator so tests need no seeds from the outside
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Lcg {
        Lcg(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u8(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u8
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_u8()).collect()
    }
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

const CRC_TABLE: [u32; 256] = {
    let mut table = [0_u32; 256];
    let mut n = 0;

    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;

        while k < 8 {
            c = if c & 1 == 1 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

pub fn crc32(parts: &[&[u8]]) -> u32 {
    let mut crc = u32::MAX;

    for &byte in parts.iter().flat_map(|x| x.iter()) {
        crc = CRC_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ u32::MAX
}

/// Append a chunk with a correct crc
pub fn write_chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    let crc = crc32(&[name, data]);

    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.to_be_bytes());
}

pub fn ihdr_data(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    data
}

/// Chunk level png writer
pub struct PngBuilder {
    out: Vec<u8>
}

impl PngBuilder {
    /// Signature only
    pub fn new() -> PngBuilder {
        PngBuilder {
            out: SIGNATURE.to_vec()
        }
    }

    /// Signature followed by an IHDR chunk
    pub fn with_header(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> PngBuilder {
        PngBuilder::new().chunk(b"IHDR", &ihdr_data(width, height, depth, color, interlace))
    }

    pub fn chunk(mut self, name: &[u8; 4], data: &[u8]) -> PngBuilder {
        write_chunk(&mut self.out, name, data);
        self
    }

    /// Compress filtered scanlines into a single IDAT chunk
    pub fn idat(self, scanlines: &[u8]) -> PngBuilder {
        let compressed = zlib(scanlines);
        self.chunk(b"IDAT", &compressed)
    }

    /// Compress filtered scanlines and split them over several IDAT chunks
    pub fn split_idat(mut self, scanlines: &[u8], pieces: usize) -> PngBuilder {
        let compressed = zlib(scanlines);
        let size = (compressed.len() + pieces - 1) / pieces;

        for piece in compressed.chunks(size.max(1)) {
            write_chunk(&mut self.out, b"IDAT", piece);
        }
        self
    }

    /// Append IEND and return the stream
    pub fn finish(self) -> Vec<u8> {
        self.chunk(b"IEND", &[]).out
    }

    /// The stream so far, without IEND
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = i16::from(a) + i16::from(b) - i16::from(c);
    let pa = (p - i16::from(a)).abs();
    let pb = (p - i16::from(b)).abs();
    let pc = (p - i16::from(c)).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Apply a png filter to a row
pub fn forward_filter(filter: u8, line: &[u8], prev: &[u8], bpp: usize) -> Vec<u8> {
    let mut out = vec![0; line.len()];

    for i in 0..line.len() {
        let a = if i >= bpp { line[i - bpp] } else { 0 };
        let b = prev[i];
        let c = if i >= bpp { prev[i - bpp] } else { 0 };

        let prediction = match filter {
            0 => 0,
            1 => a,
            2 => b,
            3 => ((u16::from(a) + u16::from(b)) / 2) as u8,
            4 => paeth_predictor(a, b, c),
            _ => panic!("bad filter {filter}")
        };
        out[i] = line[i].wrapping_sub(prediction);
    }
    out
}

/// Filter rows of a non interlaced image cycling through all filter types
pub fn filtered_scanlines(rows: &[Vec<u8>], bits_per_pixel: usize) -> Vec<u8> {
    let bpp = (bits_per_pixel / 8).max(1);
    let mut out = Vec::new();
    let mut prev = vec![0; rows.first().map_or(0, |r| r.len())];

    for (y, row) in rows.iter().enumerate() {
        let filter = (y % 5) as u8;
        out.push(filter);
        out.extend(forward_filter(filter, row, &prev, bpp));
        prev.clone_from(row);
    }
    out
}

const ADAM7: [(usize, usize, usize, usize); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2)
];

fn copy_pixel(src: &[u8], sx: usize, dst: &mut [u8], dx: usize, bits: usize) {
    if bits >= 8 {
        let n = bits / 8;
        dst[dx * n..dx * n + n].copy_from_slice(&src[sx * n..sx * n + n]);
    } else {
        let mask = ((1_u16 << bits) - 1) as u8;
        let s_bit = sx * bits;
        let value = (src[s_bit / 8] >> (8 - bits - s_bit % 8)) & mask;
        let d_bit = dx * bits;
        dst[d_bit / 8] |= value << (8 - bits - d_bit % 8);
    }
}

/// Split packed image rows into the seven Adam7 passes and filter them
pub fn adam7_scanlines(
    width: usize, height: usize, bits_per_pixel: usize, rows: &[Vec<u8>]
) -> Vec<u8> {
    let bpp = (bits_per_pixel / 8).max(1);
    let mut out = Vec::new();
    let mut filter_cycle = 0;

    for (xo, yo, xs, ys) in ADAM7 {
        let pass_width = if width > xo { (width - xo + xs - 1) / xs } else { 0 };
        let pass_height = if height > yo { (height - yo + ys - 1) / ys } else { 0 };

        if pass_width == 0 || pass_height == 0 {
            continue;
        }
        let row_bytes = (pass_width * bits_per_pixel + 7) / 8;
        let mut prev = vec![0; row_bytes];

        for j in 0..pass_height {
            let y = yo + j * ys;
            let mut line = vec![0; row_bytes];

            for i in 0..pass_width {
                copy_pixel(&rows[y], xo + i * xs, &mut line, i, bits_per_pixel);
            }
            let filter = (filter_cycle % 5) as u8;
            filter_cycle += 1;

            out.push(filter);
            out.extend(forward_filter(filter, &line, &prev, bpp));
            prev = line;
        }
    }
    out
}

/// Random packed rows, padding bits at the end of each row are cleared
pub fn random_rows(
    width: usize, height: usize, bits_per_pixel: usize, max_value: Option<u8>, seed: u64
) -> Vec<Vec<u8>> {
    let mut rng = Lcg::new(seed);
    let row_bytes = (width * bits_per_pixel + 7) / 8;

    (0..height)
        .map(|_| {
            let mut row = vec![0; row_bytes];

            if bits_per_pixel < 8 {
                for x in 0..width {
                    let mut value = rng.next_u8() & (((1_u16 << bits_per_pixel) - 1) as u8);
                    if let Some(max) = max_value {
                        value = value.min(max);
                    }
                    copy_pixel(&[value << (8 - bits_per_pixel)], 0, &mut row, x, bits_per_pixel);
                }
            } else {
                for byte in row.iter_mut() {
                    *byte = rng.next_u8();
                    if let Some(max) = max_value {
                        *byte = (*byte).min(max);
                    }
                }
            }
            row
        })
        .collect()
}

/// Settings for images produced by the png crate encoder
pub struct RefImage {
    pub width:   u32,
    pub height:  u32,
    pub color:   png::ColorType,
    pub depth:   png::BitDepth,
    pub filter:  png::FilterType,
    pub palette: Option<Vec<u8>>,
    pub trns:    Option<Vec<u8>>
}

impl RefImage {
    pub fn new(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth) -> RefImage {
        RefImage {
            width,
            height,
            color,
            depth,
            filter: png::FilterType::Sub,
            palette: None,
            trns: None
        }
    }

    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(self.color);
            encoder.set_depth(self.depth);
            encoder.set_filter(self.filter);

            if let Some(palette) = &self.palette {
                encoder.set_palette(palette.clone());
            }
            if let Some(trns) = &self.trns {
                encoder.set_trns(trns.clone());
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }
        out
    }
}

/// Decode with the png crate, expanding palettes, low bit gray and tRNS
pub fn decode_ref(data: &[u8]) -> Vec<u8> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(Transformations::EXPAND);

    let mut reader = decoder.read_info().unwrap();

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    buf
}

/// Options producing the same layout as [`decode_ref`]
pub fn expanding_options() -> DecodeOptions {
    DecodeOptions::default()
        .set_expand_palette(true)
        .set_output_8bit_gray(true)
}

pub fn decode(data: &[u8], options: DecodeOptions) -> DecodedImage {
    PngDecoder::new_with_options(data, options)
        .decode()
        .unwrap()
}

/// Decode with both decoders and compare samples byte for byte
pub fn compare_with_reference(data: &[u8]) {
    let ours = decode(data, expanding_options()).raster().to_be_bytes();
    let reference = decode_ref(data);

    assert_eq!(ours.len(), reference.len());
    assert_eq!(ours, reference);
}
