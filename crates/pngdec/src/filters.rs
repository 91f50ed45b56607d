/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline de-filtering
//!
//! Every scanline is prefixed with a filter byte describing how the bytes
//! were predicted from their neighbours. The functions here undo the
//! prediction writing into `current`, `raw` holds the filtered bytes without
//! the filter byte and `prev_row` the already reconstructed row above.
//!
//! All arithmetic wraps at 256.
use std::mem::swap;

use crate::enums::FilterMethod;
use crate::error::PngDecodeErrors;

pub fn handle_none(raw: &[u8], current: &mut [u8]) {
    let end = current.len().min(raw.len());
    current[..end].copy_from_slice(&raw[..end]);
}

#[allow(clippy::manual_memcpy)]
pub fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < components {
        return handle_none(raw, current);
    }
    // handle leftmost byte explicitly
    for i in 0..components {
        current[i] = raw[i];
    }
    // raw length is one row,so always keep it in check
    let end = current.len().min(raw.len());

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row) {
        *recon = (*filt).wrapping_add(*up)
    }
}

pub fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let first = components.min(end);

    // no left neighbour, so only half of the byte above
    for i in 0..first {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }

    for i in first..end {
        // needs nine bits of precision
        let a = u16::from(current[i - components]);
        let b = u16::from(prev_row[i]);

        current[i] = raw[i].wrapping_add(((a + b) >> 1) as u8);
    }
}

pub fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let first = components.min(end);

    // with a and c zero the predictor always picks b
    for i in 0..first {
        current[i] = raw[i].wrapping_add(prev_row[i]);
    }

    for i in first..end {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// The Paeth predictor
///
/// Picks whichever of the left (`a`), above (`b`) and upper left (`c`)
/// bytes is closest to `a + b - c`, preferring `a`, then `b`, then `c`
/// on ties.
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a_i = i16::from(a);
    let b_i = i16::from(b);
    let c_i = i16::from(c);

    let p = a_i + b_i - c_i;

    let pa = (p - a_i).abs();
    let pb = (p - b_i).abs();
    let pc = (p - c_i).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Reconstructs scanlines of a single pass
///
/// Holds two owned rows, the row being reconstructed and the one above it.
/// They trade places before every row so the previous row is never
/// written while it is read.
pub struct ScanlineDefilter {
    bpp:      usize,
    current:  Vec<u8>,
    previous: Vec<u8>
}

impl ScanlineDefilter {
    /// Create a defilter for pixels spanning `bpp` bytes (at least one)
    pub fn new(bpp: usize) -> ScanlineDefilter {
        ScanlineDefilter {
            bpp:      bpp.max(1),
            current:  Vec::new(),
            previous: Vec::new()
        }
    }

    /// Prepare for a new pass whose rows are `row_bytes` long
    ///
    /// The row above the first row of a pass is all zeroes.
    pub fn start_pass(&mut self, row_bytes: usize) {
        self.current.clear();
        self.current.resize(row_bytes, 0);
        self.previous.clear();
        self.previous.resize(row_bytes, 0);
    }

    /// Reconstruct one row from its filter byte and filtered bytes
    ///
    /// `raw` must be exactly as long as the `row_bytes` given to
    /// [`start_pass`](Self::start_pass). Returns the reconstructed row.
    pub fn defilter_row(&mut self, filter_byte: u8, raw: &[u8]) -> Result<&[u8], PngDecodeErrors> {
        let filter =
            FilterMethod::from_int(filter_byte).ok_or(PngDecodeErrors::UnknownFilterType(filter_byte))?;

        // the row we reconstructed last is now the row above
        swap(&mut self.current, &mut self.previous);

        let prev_row = &self.previous;
        let current = &mut self.current;

        match filter {
            FilterMethod::None => handle_none(raw, current),
            FilterMethod::Sub => handle_sub(raw, current, self.bpp),
            FilterMethod::Up => handle_up(prev_row, raw, current),
            FilterMethod::Average => handle_avg(prev_row, raw, current, self.bpp),
            FilterMethod::Paeth => handle_paeth(prev_row, raw, current, self.bpp)
        }
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_avg, handle_paeth, handle_sub, handle_up, paeth, ScanlineDefilter};
    use crate::error::PngDecodeErrors;

    #[test]
    fn sub_adds_left_byte() {
        let mut out = [0; 2];
        handle_sub(&[10, 5], &mut out, 1);
        assert_eq!(out, [10, 15]);
    }

    #[test]
    fn up_adds_byte_above() {
        let mut out = [0; 2];
        handle_up(&[1, 2], &[10, 5], &mut out);
        assert_eq!(out, [11, 7]);
    }

    #[test]
    fn sub_wraps() {
        let mut out = [0; 4];
        handle_sub(&[200, 100, 100, 200], &mut out, 2);
        assert_eq!(out, [200, 100, 44, 44]);
    }

    #[test]
    fn average_floors_nine_bit_sum() {
        let mut out = [0; 3];
        // 1 + 255/2, then 3 + (128 + 255)/2, then 0 + (194 + 1)/2
        handle_avg(&[255, 255, 1], &[1, 3, 0], &mut out, 1);
        assert_eq!(out, [128, 194, 97]);
    }

    #[test]
    fn paeth_ties() {
        assert_eq!(paeth(5, 5, 5), 5);
        // p = 15, distances 5, 5, 0 so c wins
        assert_eq!(paeth(10, 20, 15), 15);
        // p = 10, distances 0, 10, 10
        assert_eq!(paeth(10, 20, 20), 10);
        // p = 20, distances 10, 0, 10
        assert_eq!(paeth(10, 20, 10), 20);
    }

    #[test]
    fn paeth_first_bytes_use_above() {
        let mut out = [0; 2];
        handle_paeth(&[7, 9], &[1, 1], &mut out, 1);
        // second byte: paeth(8, 9, 7) -> p = 10, picks b = 9
        assert_eq!(out, [8, 10]);
    }

    #[test]
    fn rows_swap_between_calls() {
        let mut defilter = ScanlineDefilter::new(1);
        defilter.start_pass(2);

        // Up on the first row sees zeroes
        assert_eq!(defilter.defilter_row(2, &[3, 4]).unwrap(), &[3, 4]);
        assert_eq!(defilter.defilter_row(2, &[1, 1]).unwrap(), &[4, 5]);
        assert_eq!(defilter.defilter_row(0, &[9, 9]).unwrap(), &[9, 9]);
        assert_eq!(defilter.defilter_row(2, &[1, 1]).unwrap(), &[10, 10]);

        // a new pass starts from zeroes again
        defilter.start_pass(2);
        assert_eq!(defilter.defilter_row(2, &[1, 1]).unwrap(), &[1, 1]);
    }

    #[test]
    fn unknown_filter() {
        let mut defilter = ScanlineDefilter::new(1);
        defilter.start_pass(1);
        assert!(matches!(
            defilter.defilter_row(5, &[0]),
            Err(PngDecodeErrors::UnknownFilterType(5))
        ));
    }
}
