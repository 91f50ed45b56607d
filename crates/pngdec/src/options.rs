/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder options

/// Options controlling what the decoder produces
///
/// Options are built by chaining setters on the default value
///
/// ```
/// use pngdec::DecodeOptions;
///
/// let options = DecodeOptions::default()
///     .set_expand_palette(true)
///     .set_suppress_alpha(false);
/// assert!(options.get_expand_palette());
/// ```
#[derive(Copy, Clone, Debug)]
pub struct DecodeOptions {
    suppress_alpha:           bool,
    expand_palette:           bool,
    output_8bit_gray:         bool,
    expand_gray_alpha:        bool,
    perform_gamma_correction: bool,
    user_exponent:            f32,
    display_exponent:         f32,
    generate_encode_params:   bool,
    max_width:                usize,
    max_height:               usize,
    inflate_confirm_adler:    bool
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            suppress_alpha:           false,
            expand_palette:           false,
            output_8bit_gray:         false,
            expand_gray_alpha:        false,
            perform_gamma_correction: false,
            user_exponent:            1.0,
            display_exponent:         2.2,
            generate_encode_params:   false,
            max_width:                1 << 14,
            max_height:               1 << 14,
            inflate_confirm_adler:    true
        }
    }
}

impl DecodeOptions {
    /// Drop alpha channels and ignore transparency chunks
    pub const fn set_suppress_alpha(mut self, yes: bool) -> Self {
        self.suppress_alpha = yes;
        self
    }
    pub const fn get_suppress_alpha(&self) -> bool {
        self.suppress_alpha
    }

    /// Look palette indices up and output RGB or RGBA samples
    pub const fn set_expand_palette(mut self, yes: bool) -> Self {
        self.expand_palette = yes;
        self
    }
    pub const fn get_expand_palette(&self) -> bool {
        self.expand_palette
    }

    /// Promote grayscale images with less than 8 bits to 8 bit samples
    pub const fn set_output_8bit_gray(mut self, yes: bool) -> Self {
        self.output_8bit_gray = yes;
        self
    }
    /// Returns true if 8 bit gray was requested or gamma correction is on
    pub const fn get_output_8bit_gray(&self) -> bool {
        self.output_8bit_gray || self.perform_gamma_correction
    }

    /// Expand gray + alpha pixels to gray, gray, gray, alpha
    pub const fn set_expand_gray_alpha(mut self, yes: bool) -> Self {
        self.expand_gray_alpha = yes;
        self
    }
    pub const fn get_expand_gray_alpha(&self) -> bool {
        self.expand_gray_alpha
    }

    /// Turn gamma correction on or off keeping the current exponents
    pub const fn set_perform_gamma_correction(mut self, yes: bool) -> Self {
        self.perform_gamma_correction = yes;
        self
    }
    pub const fn get_perform_gamma_correction(&self) -> bool {
        self.perform_gamma_correction
    }

    /// Turn gamma correction on with the given user and display exponents
    ///
    /// Samples are mapped through `x ^ (user / (file_gamma * display))`
    pub const fn set_gamma_correction(mut self, user_exponent: f32, display_exponent: f32) -> Self {
        self.perform_gamma_correction = true;
        self.user_exponent = user_exponent;
        self.display_exponent = display_exponent;
        self
    }
    pub const fn get_user_exponent(&self) -> f32 {
        self.user_exponent
    }
    pub const fn get_display_exponent(&self) -> f32 {
        self.display_exponent
    }

    /// Record the file's parameters in an [`EncodeParams`](crate::EncodeParams)
    pub const fn set_generate_encode_params(mut self, yes: bool) -> Self {
        self.generate_encode_params = yes;
        self
    }
    pub const fn get_generate_encode_params(&self) -> bool {
        self.generate_encode_params
    }

    pub const fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    pub const fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Whether the zlib adler checksum of the image data is confirmed
    pub const fn set_inflate_confirm_adler(mut self, yes: bool) -> Self {
        self.inflate_confirm_adler = yes;
        self
    }
    pub const fn get_inflate_confirm_adler(&self) -> bool {
        self.inflate_confirm_adler
    }
}
