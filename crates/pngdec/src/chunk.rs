/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk framing
//!
//! A png stream is the eight byte signature followed by chunks laid out as
//! `length:u32 | type:[u8;4] | data:[u8;length] | crc:u32`, all big endian.
use std::io::{ErrorKind, Read};

use log::trace;

use crate::constants::PNG_SIGNATURE;
use crate::enums::PngChunkType;
use crate::error::PngDecodeErrors;

/// A fully read chunk
///
/// The crc is carried along but never checked.
#[derive(Clone, Debug)]
pub struct PngChunk {
    pub length:     usize,
    pub chunk:      [u8; 4],
    pub chunk_type: PngChunkType,
    pub data:       Vec<u8>,
    pub crc:        u32
}

impl PngChunk {
    /// Chunk name as a string, non-ascii bytes are replaced
    pub fn name(&self) -> String {
        self.chunk.iter().map(|x| char::from(*x)).collect()
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8, PngDecodeErrors> {
        self.data
            .get(offset)
            .copied()
            .ok_or(PngDecodeErrors::Truncated("chunk field"))
    }

    pub fn get_u16_be(&self, offset: usize) -> Result<u16, PngDecodeErrors> {
        let bytes = self.get_bytes(offset, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn get_u32_be(&self, offset: usize) -> Result<u32, PngDecodeErrors> {
        let bytes = self.get_bytes(offset, 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn get_bytes(&self, offset: usize, length: usize) -> Result<&[u8], PngDecodeErrors> {
        offset
            .checked_add(length)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(PngDecodeErrors::Truncated("chunk field"))
    }
}

/// Reads the signature and then chunks from an underlying byte source
pub struct ChunkReader<R: Read> {
    inner:  R,
    // length and type already pulled from `inner` by a peek
    peeked: Option<(u32, [u8; 4])>
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R) -> ChunkReader<R> {
        ChunkReader {
            inner,
            peeked: None
        }
    }

    /// Read and confirm the png signature
    pub fn read_signature(&mut self) -> Result<(), PngDecodeErrors> {
        let mut signature = [0; 8];

        match self.inner.read_exact(&mut signature) {
            Ok(()) => (),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(PngDecodeErrors::BadSignature)
            }
            Err(e) => return Err(PngDecodeErrors::IoError(e))
        }
        if u64::from_be_bytes(signature) != PNG_SIGNATURE {
            return Err(PngDecodeErrors::BadSignature);
        }
        Ok(())
    }

    /// Return the type of the next chunk without consuming it
    pub fn peek_chunk_type(&mut self) -> Result<[u8; 4], PngDecodeErrors> {
        if let Some((_, chunk)) = self.peeked {
            return Ok(chunk);
        }
        let length = self.read_u32("chunk length")?;
        let mut chunk = [0; 4];
        self.read_exact(&mut chunk, "chunk type")?;

        self.peeked = Some((length, chunk));

        Ok(chunk)
    }

    /// Read the next chunk, including its data and crc
    pub fn read_chunk(&mut self) -> Result<PngChunk, PngDecodeErrors> {
        let (length, chunk) = match self.peeked.take() {
            Some(header) => header,
            None => {
                let length = self.read_u32("chunk length")?;
                let mut chunk = [0; 4];
                self.read_exact(&mut chunk, "chunk type")?;
                (length, chunk)
            }
        };
        let length = length as usize;

        // read through `take` so a corrupt length cannot force a huge allocation
        let mut data = Vec::new();
        let read = (&mut self.inner)
            .take(length as u64)
            .read_to_end(&mut data)?;

        if read != length {
            return Err(PngDecodeErrors::Truncated("chunk data"));
        }
        let crc = self.read_u32("chunk crc")?;

        let chunk_type = PngChunkType::from_bytes(&chunk);

        trace!(
            "Chunk {:?}, length {}",
            core::str::from_utf8(&chunk).unwrap_or("XXXX"),
            length
        );

        Ok(PngChunk {
            length,
            chunk,
            chunk_type,
            data,
            crc
        })
    }

    fn read_u32(&mut self, what: &'static str) -> Result<u32, PngDecodeErrors> {
        let mut bytes = [0; 4];
        self.read_exact(&mut bytes, what)?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_exact(&mut self, buf: &mut [u8], what: &'static str) -> Result<(), PngDecodeErrors> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(PngDecodeErrors::Truncated(what)),
            Err(e) => Err(PngDecodeErrors::IoError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkReader;
    use crate::enums::PngChunkType;
    use crate::error::PngDecodeErrors;

    fn chunk_bytes(name: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(data);
        // deliberately wrong crc, it is never confirmed
        out.extend_from_slice(&0xdead_beef_u32.to_be_bytes());
        out
    }

    #[test]
    fn bad_signature() {
        let data = [0x89, b'P', b'N', b'G', 0, 0, 0, 0];
        let mut reader = ChunkReader::new(&data[..]);
        assert!(matches!(
            reader.read_signature(),
            Err(PngDecodeErrors::BadSignature)
        ));
    }

    #[test]
    fn peek_then_read() {
        let data = chunk_bytes(b"tEXt", b"a\0b");
        let mut reader = ChunkReader::new(data.as_slice());

        assert_eq!(&reader.peek_chunk_type().unwrap(), b"tEXt");
        // peeking twice does not advance
        assert_eq!(&reader.peek_chunk_type().unwrap(), b"tEXt");

        let chunk = reader.read_chunk().unwrap();
        assert_eq!(chunk.chunk_type, PngChunkType::tEXt);
        assert_eq!(chunk.data, b"a\0b");
        assert_eq!(chunk.crc, 0xdead_beef);
    }

    #[test]
    fn truncated_data() {
        let mut data = chunk_bytes(b"IDAT", &[1, 2, 3, 4, 5]);
        data.truncate(10);
        let mut reader = ChunkReader::new(data.as_slice());
        assert!(matches!(
            reader.read_chunk(),
            Err(PngDecodeErrors::Truncated(_))
        ));
    }

    #[test]
    fn truncated_crc() {
        let mut data = chunk_bytes(b"IDAT", &[1, 2]);
        data.pop();
        let mut reader = ChunkReader::new(data.as_slice());
        assert!(matches!(
            reader.read_chunk(),
            Err(PngDecodeErrors::Truncated(_))
        ));
    }
}
