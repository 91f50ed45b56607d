/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};

use log::info;
use pngdec::error::PngDecodeErrors;
use pngdec::{DecodeOptions, DecodedImage, PngDecoder};

/// Decode a png file from disk
pub fn decode_file(file_path: &OsStr, options: DecodeOptions) -> Result<DecodedImage, PngDecodeErrors> {
    let fd = BufReader::new(File::open(file_path)?);

    PngDecoder::new_with_options(fd, options).decode()
}

/// Write the raw samples of `image`, 16 bit samples in big endian
pub fn write_raw(file_path: &OsStr, image: &DecodedImage) -> Result<(), PngDecodeErrors> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(file_path)?;

    let mut writer = BufWriter::new(file);
    let bytes = image.raster().to_be_bytes();

    writer.write_all(&bytes)?;
    writer.flush()?;

    info!("Wrote {} bytes to {:?}", bytes.len(), file_path);

    Ok(())
}
