/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use png::{BitDepth, ColorType, FilterType};

mod common;

use common::{
    compare_with_reference, decode, expanding_options, filtered_scanlines, random_rows,
    PngBuilder, RefImage, GRAY, RGB, RGBA
};

fn encode_with_filter(filter: FilterType, color: ColorType, depth: BitDepth, bpp_bits: usize) -> Vec<u8> {
    let (width, height) = (29, 21);
    let data: Vec<u8> = random_rows(width, height, bpp_bits, None, filter as u64)
        .into_iter()
        .flatten()
        .collect();

    let mut image = RefImage::new(width as u32, height as u32, color, depth);
    image.filter = filter;
    image.encode(&data)
}

fn test_filter(filter: FilterType) {
    compare_with_reference(&encode_with_filter(filter, ColorType::Rgb, BitDepth::Eight, 24));
    compare_with_reference(&encode_with_filter(filter, ColorType::Rgba, BitDepth::Sixteen, 64));
    compare_with_reference(&encode_with_filter(filter, ColorType::Grayscale, BitDepth::Two, 2));
}

#[test]
fn test_none() {
    test_filter(FilterType::NoFilter);
}

#[test]
fn test_sub() {
    test_filter(FilterType::Sub);
}

#[test]
fn test_up() {
    test_filter(FilterType::Up);
}

#[test]
fn test_avg() {
    test_filter(FilterType::Avg);
}

#[test]
fn test_paeth() {
    test_filter(FilterType::Paeth);
}

#[test]
fn test_mixed_filters_per_row() {
    // each row uses the next filter type
    for (color, channels) in [(GRAY, 1), (RGB, 3), (RGBA, 4)] {
        let (width, height) = (17, 12);
        let rows = random_rows(width, height, channels * 8, None, 99);

        let png = PngBuilder::with_header(width as u32, height as u32, 8, color, 0)
            .idat(&filtered_scanlines(&rows, channels * 8))
            .finish();

        let image = decode(&png, expanding_options());
        let expected: Vec<u8> = rows.into_iter().flatten().collect();

        assert_eq!(image.raster().to_be_bytes(), expected);
        compare_with_reference(&png);
    }
}

#[test]
fn test_bad_filter_byte() {
    let png = PngBuilder::with_header(2, 2, 8, GRAY, 0)
        .idat(&[0, 1, 2, 5, 3, 4])
        .finish();

    let err = pngdec::PngDecoder::new(png.as_slice()).decode().unwrap_err();

    assert!(matches!(
        err,
        pngdec::error::PngDecodeErrors::UnknownFilterType(5)
    ));
}
