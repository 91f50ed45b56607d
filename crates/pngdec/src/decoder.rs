/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Read;

use log::{debug, info, trace};
use zune_core::result::DecodingResult;
use zune_inflate::DeflateOptions;

use crate::chunk::{ChunkReader, PngChunk};
use crate::constants::{DEPTH_SCALE_TABLE, FILE_TYPE, INFLATE_HINT_RATIO};
use crate::enums::{PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::ScanlineDefilter;
use crate::gamma::GammaState;
use crate::header::ImageHeader;
use crate::interlace::passes;
use crate::options::DecodeOptions;
use crate::post_process::{
    unpack_sample, PostProcess, PostProcessMode, PostProcessPipeline, Transparency
};
use crate::properties::{EncodeParams, Properties, PropertyValue, TextChunk};
use crate::raster::{ColorModel, Raster, RasterData, RasterSource};

/// Everything one decode learns from the chunk stream
///
/// Owned by a single [`PngDecoder`] and handed by reference to each
/// chunk handler.
pub(crate) struct DecodeContext {
    pub(crate) options:          DecodeOptions,
    pub(crate) header:           Option<ImageHeader>,
    /// RGB entries, gamma corrected when correcting
    pub(crate) palette:          Option<Vec<[u8; 3]>>,
    pub(crate) transparency:     Option<Transparency>,
    pub(crate) process:          Option<PostProcess>,
    pub(crate) gamma:            GammaState,
    pub(crate) significant_bits: Option<Vec<u8>>,
    pub(crate) properties:       Properties,
    pub(crate) encode_params:    Option<EncodeParams>,
    pub(crate) text:             Vec<TextChunk>,
    pub(crate) ztext:            Vec<TextChunk>,
    /// Number of unrecognised chunks stored so far
    pub(crate) chunk_index:      usize,
    pub(crate) idat_chunks:      Vec<u8>
}

impl DecodeContext {
    fn new(options: DecodeOptions) -> DecodeContext {
        let mut properties = Properties::new();
        properties.insert("file_type", PropertyValue::Str(FILE_TYPE.to_string()));

        DecodeContext {
            options,
            header: None,
            palette: None,
            transparency: None,
            process: None,
            gamma: GammaState::new(&options),
            significant_bits: None,
            properties,
            encode_params: None,
            text: Vec::new(),
            ztext: Vec::new(),
            chunk_index: 0,
            idat_chunks: Vec::new()
        }
    }

    fn dispatch(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        match chunk.chunk_type {
            PngChunkType::IHDR => self.parse_ihdr(&chunk),
            PngChunkType::PLTE => self.parse_plte(&chunk),
            PngChunkType::IDAT => {
                self.idat_chunks.extend_from_slice(&chunk.data);
                Ok(())
            }
            PngChunkType::IEND => self.parse_iend(),
            PngChunkType::cHRM => self.parse_chrm(&chunk),
            PngChunkType::gAMA => self.parse_gama(&chunk),
            PngChunkType::iCCP => self.parse_iccp(&chunk),
            PngChunkType::sBIT => self.parse_sbit(&chunk),
            PngChunkType::sRGB => self.parse_srgb(&chunk),
            PngChunkType::bKGD => self.parse_bkgd(&chunk),
            PngChunkType::hIST => self.parse_hist(&chunk),
            PngChunkType::tRNS => self.parse_trns(&chunk),
            PngChunkType::pHYs => self.parse_phys(&chunk),
            PngChunkType::tIME => self.parse_time(&chunk),
            PngChunkType::tEXt => self.parse_text(&chunk),
            PngChunkType::zTXt => self.parse_ztxt(&chunk),
            PngChunkType::unkn => {
                self.parse_unknown(chunk);
                Ok(())
            }
        }
    }
}

/// A png decoder
///
/// Reads the whole chunk stream from `R` and produces a
/// [`DecodedImage`].
///
/// # Example
/// ```no_run
/// use pngdec::{DecodeOptions, PngDecoder};
///
/// let file = std::fs::File::open("image.png").unwrap();
/// let options = DecodeOptions::default().set_expand_palette(true);
///
/// let mut decoder = PngDecoder::new_with_options(std::io::BufReader::new(file), options);
/// let image = decoder.decode().unwrap();
///
/// println!("{}x{}", image.width(), image.height());
/// ```
pub struct PngDecoder<R: Read> {
    reader:          ChunkReader<R>,
    ctx:             DecodeContext,
    decoded_headers: bool,
    decoded:         bool
}

impl<R: Read> PngDecoder<R> {
    pub fn new(source: R) -> PngDecoder<R> {
        PngDecoder::new_with_options(source, DecodeOptions::default())
    }

    pub fn new_with_options(source: R, options: DecodeOptions) -> PngDecoder<R> {
        PngDecoder {
            reader: ChunkReader::new(source),
            ctx: DecodeContext::new(options),
            decoded_headers: false,
            decoded: false
        }
    }

    pub const fn get_options(&self) -> &DecodeOptions {
        &self.ctx.options
    }

    /// Read the signature and every chunk up to and including IEND
    ///
    /// After this the header, properties and encode parameters are
    /// available, image data is kept compressed until
    /// [`decode`](Self::decode).
    pub fn decode_headers(&mut self) -> Result<(), PngDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        self.reader.read_signature()?;

        match self.reader.peek_chunk_type() {
            Ok(chunk) if &chunk == b"IHDR" => (),
            Ok(_) | Err(PngDecodeErrors::Truncated(_)) => return Err(PngDecodeErrors::MissingHeader),
            Err(e) => return Err(e)
        }

        loop {
            let chunk = self.reader.read_chunk()?;
            let is_end = chunk.chunk_type == PngChunkType::IEND;

            self.ctx.dispatch(chunk)?;

            if is_end {
                break;
            }
        }
        self.decoded_headers = true;

        Ok(())
    }

    /// Image header, None before headers are decoded
    pub const fn get_header(&self) -> Option<&ImageHeader> {
        self.ctx.header.as_ref()
    }

    /// Width and height, None before headers are decoded
    pub fn get_dimensions(&self) -> Option<(usize, usize)> {
        self.ctx.header.map(|h| (h.width, h.height))
    }

    /// Properties found so far
    pub const fn get_properties(&self) -> &Properties {
        &self.ctx.properties
    }

    /// The transform selected for pixels, None before headers are decoded
    pub fn get_post_process(&self) -> Option<&PostProcess> {
        self.ctx.process.as_ref()
    }

    /// Encode parameters if they were requested
    pub const fn get_encode_params(&self) -> Option<&EncodeParams> {
        self.ctx.encode_params.as_ref()
    }

    /// Decode the image
    ///
    /// Can only be called once per decoder, a second call returns an error.
    pub fn decode(&mut self) -> Result<DecodedImage, PngDecodeErrors> {
        if self.decoded {
            return Err(PngDecodeErrors::GenericStatic("Image already decoded"));
        }
        self.decode_headers()?;
        self.decoded = true;

        let header = self.ctx.header.ok_or(PngDecodeErrors::MissingHeader)?;
        let process = self
            .ctx
            .process
            .ok_or(PngDecodeErrors::GenericStatic("No post process selected"))?;

        if header.color == PngColor::Palette && self.ctx.palette.is_none() {
            return Err(PngDecodeErrors::MissingPalette("IDAT"));
        }

        let options = self.ctx.options;
        let output_depth = process.output_depth(&header, &options);

        let pipeline = self.build_pipeline(&header, process);

        let expected = image_data_size(&header);
        let data = self.inflate(expected)?;
        // done with compressed data
        self.ctx.idat_chunks = Vec::new();

        if data.len() < expected {
            debug!(
                "Image needs {} bytes of scanlines, stream holds {}",
                expected,
                data.len()
            );
            return Err(PngDecodeErrors::Truncated("image data"));
        }

        let mut raster = Raster::new(
            header.width,
            header.height,
            process.output_bands,
            output_depth
        );
        decode_passes(&header, &pipeline, &data, &mut raster)?;

        let color_model = self.color_model(&header, &process);

        Ok(DecodedImage {
            header,
            raster,
            color_model,
            properties: self.ctx.properties.clone(),
            encode_params: self.ctx.encode_params.clone()
        })
    }

    fn build_pipeline(&self, header: &ImageHeader, process: PostProcess) -> PostProcessPipeline {
        let correcting = self.ctx.options.get_perform_gamma_correction();

        let gamma_lut = if correcting {
            Some(self.ctx.gamma.build_lut(header.depth))
        } else {
            None
        };

        let gray_lut = match process.mode {
            PostProcessMode::GrayLutExpand | PostProcessMode::GrayLutExpandAddTransparency => {
                match &gamma_lut {
                    Some(lut) => lut.clone(),
                    None => expand_bits_table(header.depth)
                        .into_iter()
                        .map(u16::from)
                        .collect()
                }
            }
            _ => Vec::new()
        };

        let alpha = match &self.ctx.transparency {
            Some(Transparency::PaletteAlpha(alpha)) => alpha.as_slice(),
            _ => &[]
        };
        let palette = self
            .ctx
            .palette
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, rgb)| [rgb[0], rgb[1], rgb[2], alpha.get(i).copied().unwrap_or(255)])
            .collect();

        PostProcessPipeline::new(
            process,
            header.input_bands(),
            gamma_lut,
            gray_lut,
            palette,
            self.ctx.transparency.as_ref()
        )
    }

    fn inflate(&self, expected: usize) -> Result<Vec<u8>, PngDecodeErrors> {
        // the header alone does not bound the allocation, the output vector
        // grows past the hint when the stream really is that large
        let size_hint = expected.min(
            self.ctx
                .idat_chunks
                .len()
                .saturating_mul(INFLATE_HINT_RATIO)
        );

        let option = DeflateOptions::default()
            .set_size_hint(size_hint)
            .set_confirm_checksum(self.ctx.options.get_inflate_confirm_adler());

        let mut decoder = zune_inflate::DeflateDecoder::new_with_options(&self.ctx.idat_chunks, option);

        decoder
            .decode_zlib()
            .map_err(PngDecodeErrors::ZlibDecodeErrors)
    }

    fn color_model(&self, header: &ImageHeader, process: &PostProcess) -> ColorModel {
        let options = &self.ctx.options;

        if header.color == PngColor::Palette && !options.get_expand_palette() {
            let palette = self.ctx.palette.as_deref().unwrap_or(&[]);

            let alpha = match (&self.ctx.transparency, process.output_has_alpha_palette) {
                (Some(Transparency::PaletteAlpha(alpha)), true) => Some(alpha.clone()),
                _ => None
            };
            ColorModel::Indexed {
                bits: header.depth,
                red: palette.iter().map(|x| x[0]).collect(),
                green: palette.iter().map(|x| x[1]).collect(),
                blue: palette.iter().map(|x| x[2]).collect(),
                alpha
            }
        } else if header.color == PngColor::Luma && header.depth < 8 && !process.output_8bit_gray {
            let table = expand_bits_table(header.depth);

            ColorModel::Indexed {
                bits:  header.depth,
                red:   table.clone(),
                green: table.clone(),
                blue:  table,
                alpha: None
            }
        } else {
            ColorModel::component(process.output_bands, process.output_depth(header, options))
        }
    }
}

/// Gray levels of a sub 8 bit depth spread over 0..=255
fn expand_bits_table(depth: u8) -> Vec<u8> {
    let scale = DEPTH_SCALE_TABLE[usize::from(depth)];

    (0..(1_u16 << depth)).map(|x| x as u8 * scale).collect()
}

/// Bytes of filtered scanlines, filter bytes included, the header asks for
fn image_data_size(header: &ImageHeader) -> usize {
    passes(header.width, header.height, header.interlace_method)
        .iter()
        .filter(|pass| !pass.is_empty())
        .map(|pass| {
            let row_bytes = header
                .input_bands()
                .saturating_mul(pass.width)
                .saturating_mul(usize::from(header.depth))
                .saturating_add(7)
                / 8;
            row_bytes.saturating_add(1).saturating_mul(pass.height)
        })
        .fold(0, usize::saturating_add)
}

/// Defilter every pass of `data` writing post processed pixels to `raster`
fn decode_passes(
    header: &ImageHeader, pipeline: &PostProcessPipeline, data: &[u8], raster: &mut Raster
) -> Result<(), PngDecodeErrors> {
    let input_bands = header.input_bands();
    let output_bands = pipeline.process().output_bands;

    let mut defilter = ScanlineDefilter::new(header.bytes_per_pixel());

    let mut input = [0_u16; 4];
    let mut output = [0_u16; 4];

    let mut position = 0;

    for (p, pass) in passes(header.width, header.height, header.interlace_method)
        .iter()
        .enumerate()
    {
        if pass.is_empty() {
            continue;
        }
        let row_bytes = header.row_bytes(pass.width);

        trace!(
            "Pass {}: {}x{}, {} bytes per row",
            p,
            pass.width,
            pass.height,
            row_bytes
        );
        defilter.start_pass(row_bytes);

        for j in 0..pass.height {
            let end = position + 1 + row_bytes;

            let scanline = data
                .get(position..end)
                .ok_or(PngDecodeErrors::Truncated("image data"))?;

            let row = defilter.defilter_row(scanline[0], &scanline[1..])?;

            for i in 0..pass.width {
                for (b, sample) in input[..input_bands].iter_mut().enumerate() {
                    *sample = unpack_sample(row, i * input_bands + b, header.depth);
                }
                pipeline.process_pixel(&input[..input_bands], &mut output[..output_bands]);

                let (x, y) = pass.image_position(i, j);
                raster.set_pixel(x, y, &output[..output_bands]);
            }
            position = end;
        }
    }
    if position < data.len() {
        info!("{} bytes of image data left over", data.len() - position);
    }
    Ok(())
}

/// A decoded image with its metadata
#[derive(Clone, Debug)]
pub struct DecodedImage {
    header:        ImageHeader,
    raster:        Raster,
    color_model:   ColorModel,
    properties:    Properties,
    encode_params: Option<EncodeParams>
}

impl DecodedImage {
    pub const fn width(&self) -> usize {
        self.header.width
    }

    pub const fn height(&self) -> usize {
        self.header.height
    }

    /// Output samples per pixel
    pub const fn bands(&self) -> usize {
        self.raster.bands()
    }

    /// Output bit depth
    pub const fn depth(&self) -> u8 {
        self.raster.depth()
    }

    /// The header of the source image
    pub const fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub const fn raster(&self) -> &Raster {
        &self.raster
    }

    pub const fn color_model(&self) -> &ColorModel {
        &self.color_model
    }

    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    pub const fn encode_params(&self) -> Option<&EncodeParams> {
        self.encode_params.as_ref()
    }

    /// The image is a single tile, only `(0, 0)` exists
    pub fn get_tile(&self, tile_x: usize, tile_y: usize) -> Result<&Raster, PngDecodeErrors> {
        if tile_x != 0 || tile_y != 0 {
            return Err(PngDecodeErrors::BadTileRequest(tile_x, tile_y));
        }
        Ok(&self.raster)
    }

    /// Samples as bytes or words depending on the output depth
    ///
    /// Packed rasters are returned packed.
    pub fn into_decoding_result(self) -> DecodingResult {
        match self.raster.into_data() {
            RasterData::U8(data) => DecodingResult::U8(data),
            RasterData::U16(data) => DecodingResult::U16(data)
        }
    }
}

impl RasterSource for DecodedImage {
    fn buffer(&self) -> &Raster {
        &self.raster
    }

    fn color_model(&self) -> &ColorModel {
        &self.color_model
    }
}

#[cfg(test)]
mod tests {
    use super::expand_bits_table;

    #[test]
    fn expansion_tables() {
        assert_eq!(expand_bits_table(1), [0x00, 0xff]);
        assert_eq!(expand_bits_table(2), [0x00, 0x55, 0xaa, 0xff]);

        let four = expand_bits_table(4);
        assert_eq!(four.len(), 16);
        assert_eq!(four[1], 0x11);
        assert_eq!(four[15], 0xff);
    }
}
