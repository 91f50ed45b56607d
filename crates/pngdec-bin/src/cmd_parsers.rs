/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::info;
use pngdec::DecodeOptions;

pub mod global_options;

/// Turn decoding flags into decoder options
pub fn get_decode_options(options: &ArgMatches) -> DecodeOptions {
    let max_width = options.get_one::<usize>("max-width").copied();
    let max_height = options.get_one::<usize>("max-height").copied();

    let mut decode_options = DecodeOptions::default()
        .set_suppress_alpha(options.get_flag("suppress-alpha"))
        .set_expand_palette(options.get_flag("expand-palette"))
        .set_output_8bit_gray(options.get_flag("gray8"))
        .set_expand_gray_alpha(options.get_flag("expand-gray-alpha"))
        .set_generate_encode_params(options.get_flag("encode-params"));

    if let Some(width) = max_width {
        decode_options = decode_options.set_max_width(width);
    }
    if let Some(height) = max_height {
        decode_options = decode_options.set_max_height(height);
    }

    if options.get_flag("gamma") {
        let user = options.get_one::<f32>("user-exponent").copied().unwrap_or(1.0);
        let display = options
            .get_one::<f32>("display-exponent")
            .copied()
            .unwrap_or(2.2);

        info!("Gamma correcting with user exponent {user} and display exponent {display}");

        decode_options = decode_options.set_gamma_correction(user, display);
    }
    decode_options
}
