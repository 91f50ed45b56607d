/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Gamma and chromaticity state
use crate::constants::{DEFAULT_FILE_GAMMA, SRGB_CHROMATICITY};
use crate::options::DecodeOptions;

/// Colour response information gathered from gAMA, cHRM and sRGB chunks
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GammaState {
    pub file_gamma:       f32,
    pub user_exponent:    f32,
    pub display_exponent: f32,
    pub chromaticity:     Option<[f32; 8]>,
    /// Rendering intent of the first sRGB chunk, once one is seen
    ///
    /// gAMA and cHRM chunks are ignored from then on.
    pub srgb_intent:      Option<u8>
}

impl GammaState {
    pub fn new(options: &DecodeOptions) -> GammaState {
        GammaState {
            file_gamma:       DEFAULT_FILE_GAMMA,
            user_exponent:    options.get_user_exponent(),
            display_exponent: options.get_display_exponent(),
            chromaticity:     None,
            srgb_intent:      None
        }
    }

    /// Install the values an sRGB chunk implies
    pub fn set_srgb(&mut self, intent: u8) {
        self.srgb_intent = Some(intent);
        self.file_gamma = DEFAULT_FILE_GAMMA;
        self.chromaticity = Some(SRGB_CHROMATICITY);
    }

    /// Gamma reported to callers
    ///
    /// When correcting, this is the gamma of the corrected output, i.e
    /// the file gamma scaled by `display / user`.
    pub fn reported_gamma(&self, correcting: bool) -> f32 {
        if correcting {
            self.file_gamma * (self.display_exponent / self.user_exponent)
        } else {
            self.file_gamma
        }
    }

    /// Gamma assumed before any gAMA chunk is seen, scaled like
    /// [`reported_gamma`](Self::reported_gamma)
    pub fn default_reported_gamma(&self) -> f32 {
        (1.0 / 2.2) * (self.display_exponent / self.user_exponent)
    }

    /// Build a table mapping every `bits` wide sample to its corrected value
    ///
    /// Outputs span 0..=65535 for 16 bit tables and 0..=255 otherwise.
    pub fn build_lut(&self, bits: u8) -> Vec<u16> {
        let exp = f64::from(self.user_exponent)
            / (f64::from(self.file_gamma) * f64::from(self.display_exponent));

        let num_samples = 1_usize << bits;
        let max_out_sample: u32 = if bits == 16 { 65535 } else { 255 };
        let divisor = (num_samples - 1) as f64;

        (0..num_samples)
            .map(|i| {
                let brightness = i as f64 / divisor;
                let gamma = brightness.powf(exp);
                let value = (gamma * f64::from(max_out_sample) + 0.5) as u32;

                value.min(max_out_sample) as u16
            })
            .collect()
    }
}
