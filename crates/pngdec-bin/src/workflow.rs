/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;

use clap::ArgMatches;
use log::{debug, info};
use pngdec::error::PngDecodeErrors;
use pngdec::DecodeOptions;

use crate::file_io::{decode_file, write_raw};
use crate::serde::ImageSummary;

/// Decode every input, print its summary and write raw samples when asked
///
/// Stops at the first file that fails.
pub(crate) fn decode_inputs(args: &ArgMatches, options: DecodeOptions) -> Result<(), PngDecodeErrors> {
    let inputs: Vec<&OsStr> = args.get_raw("in").into_iter().flatten().collect();
    let outputs: Vec<&OsStr> = args.get_raw("out").into_iter().flatten().collect();

    if !outputs.is_empty() && outputs.len() != inputs.len() {
        return Err(PngDecodeErrors::Generic(format!(
            "{} inputs but {} outputs, give one output per input",
            inputs.len(),
            outputs.len()
        )));
    }
    info!("Decoding {} files", inputs.len());

    for (i, in_file) in inputs.iter().enumerate() {
        debug!("Decoding {:?}", in_file);

        let image = decode_file(in_file, options)?;
        let summary = ImageSummary::new(in_file, &image);

        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| PngDecodeErrors::Generic(e.to_string()))?;

        println!("{json}");

        if let Some(out_file) = outputs.get(i) {
            write_raw(out_file, &image)?;
        }
    }
    Ok(())
}
