/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

mod common;

use common::{decode, PngBuilder, GRAY, GRAY_ALPHA, RGB, RGBA};
use pngdec::error::PngDecodeErrors;
use pngdec::{DecodeOptions, PngColor, PngDecoder, PostProcessMode, RasterData};

fn single_row(width: u32, depth: u8, color: u8, trns: Option<&[u8]>, row: &[u8]) -> Vec<u8> {
    let mut builder = PngBuilder::with_header(width, 1, depth, color, 0);

    if let Some(trns) = trns {
        builder = builder.chunk(b"tRNS", trns);
    }
    let mut scanline = vec![0];
    scanline.extend_from_slice(row);

    builder.idat(&scanline).finish()
}

#[test]
fn test_gray_key_8bit() {
    let png = single_row(3, 8, GRAY, Some(&[0, 5]), &[5, 7, 5]);
    let image = decode(&png, DecodeOptions::default());

    assert_eq!(image.bands(), 2);
    assert_eq!(image.raster().to_be_bytes(), [5, 0, 7, 255, 5, 0]);
}

#[test]
fn test_gray_key_16bit() {
    let png = single_row(2, 16, GRAY, Some(&[0x12, 0x34]), &[0x12, 0x34, 0x12, 0x35]);
    let image = decode(&png, DecodeOptions::default());

    assert_eq!(
        image.raster().data(),
        &RasterData::U16(vec![0x1234, 0, 0x1235, 0xFFFF])
    );
}

#[test]
fn test_gray_key_low_depth() {
    // 2 bit samples 0, 1, 2, 3 with 1 transparent
    let png = single_row(4, 2, GRAY, Some(&[0, 1]), &[0b0001_1011]);

    let mut decoder = PngDecoder::new(png.as_slice());
    decoder.decode_headers().unwrap();
    assert_eq!(
        decoder.get_post_process().unwrap().mode,
        PostProcessMode::GrayLutExpandAddTransparency
    );

    let image = decoder.decode().unwrap();

    assert_eq!(image.depth(), 8);
    assert_eq!(
        image.raster().to_be_bytes(),
        [0, 255, 85, 0, 170, 255, 255, 255]
    );
}

#[test]
fn test_gray_key_expanded_to_rgba() {
    let png = single_row(2, 8, GRAY, Some(&[0, 9]), &[9, 10]);
    let image = decode(&png, DecodeOptions::default().set_expand_gray_alpha(true));

    assert_eq!(image.bands(), 4);
    assert_eq!(image.raster().to_be_bytes(), [9, 9, 9, 0, 10, 10, 10, 255]);
}

#[test]
fn test_rgb_key() {
    let png = single_row(2, 8, RGB, Some(&[0, 1, 0, 2, 0, 3]), &[1, 2, 3, 1, 2, 4]);
    let image = decode(&png, DecodeOptions::default());

    assert_eq!(image.bands(), 4);
    assert_eq!(image.raster().to_be_bytes(), [1, 2, 3, 0, 1, 2, 4, 255]);
}

#[test]
fn test_rgb_key_16bit() {
    let row = [0, 1, 0, 2, 0, 3, 0xFF, 0xFF, 0, 0, 0, 0];
    let png = single_row(2, 16, RGB, Some(&[0, 1, 0, 2, 0, 3]), &row);
    let image = decode(&png, DecodeOptions::default());

    assert_eq!(
        image.raster().data(),
        &RasterData::U16(vec![1, 2, 3, 0, 0xFFFF, 0, 0, 0xFFFF])
    );
}

#[test]
fn test_suppress_alpha_ignores_keys() {
    let png = single_row(2, 8, RGB, Some(&[0, 1, 0, 2, 0, 3]), &[1, 2, 3, 1, 2, 4]);
    let image = decode(&png, DecodeOptions::default().set_suppress_alpha(true));

    assert_eq!(image.bands(), 3);
    assert_eq!(image.raster().to_be_bytes(), [1, 2, 3, 1, 2, 4]);

    let png = single_row(2, 8, GRAY, Some(&[0, 1]), &[1, 2]);
    let image = decode(&png, DecodeOptions::default().set_suppress_alpha(true));

    assert_eq!(image.bands(), 1);
    assert_eq!(image.raster().to_be_bytes(), [1, 2]);
}

#[test]
fn test_remove_alpha_channels() {
    let png = single_row(2, 8, RGBA, None, &[1, 2, 3, 4, 5, 6, 7, 8]);
    let image = decode(&png, DecodeOptions::default().set_suppress_alpha(true));

    assert_eq!(image.raster().to_be_bytes(), [1, 2, 3, 5, 6, 7]);

    let png = single_row(2, 16, GRAY_ALPHA, None, &[1, 2, 3, 4, 5, 6, 7, 8]);
    let image = decode(&png, DecodeOptions::default().set_suppress_alpha(true));

    assert_eq!(image.raster().data(), &RasterData::U16(vec![0x0102, 0x0506]));
}

#[test]
fn test_expand_gray_alpha() {
    let png = single_row(2, 8, GRAY_ALPHA, None, &[10, 20, 30, 40]);
    let image = decode(&png, DecodeOptions::default().set_expand_gray_alpha(true));

    assert_eq!(image.bands(), 4);
    assert_eq!(
        image.raster().to_be_bytes(),
        [10, 10, 10, 20, 30, 30, 30, 40]
    );
}

#[test]
fn test_trns_with_alpha_channel() {
    for color in [GRAY_ALPHA, RGBA] {
        let png = single_row(1, 8, color, Some(&[0, 0]), &[0, 0, 0, 0]);

        let err = PngDecoder::new(png.as_slice()).decode().unwrap_err();
        assert!(matches!(
            err,
            PngDecodeErrors::UnexpectedTransparencyChunk(PngColor::LumaA | PngColor::RGBA)
        ));
    }
}

#[test]
fn test_transparent_color_in_encode_params() {
    let png = single_row(1, 8, RGB, Some(&[0, 1, 0, 2, 0, 3]), &[0, 0, 0]);
    let image = decode(&png, DecodeOptions::default().set_generate_encode_params(true));

    match &image.encode_params().unwrap().kind {
        pngdec::EncodeParamsKind::Rgb {
            transparent_rgb, ..
        } => assert_eq!(transparent_rgb, &Some([1, 2, 3])),
        kind => panic!("expected rgb parameters, got {kind:?}")
    }
}
