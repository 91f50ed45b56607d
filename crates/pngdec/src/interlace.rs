/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pass scheduling for interlaced and non-interlaced images
use crate::enums::InterlaceMethod;

const XORIG: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
const YORIG: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];

const XSPC: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
const YSPC: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];

/// Geometry of one pass over the image
///
/// Pixel `(i, j)` of the pass lands at
/// `(x_offset + i * x_step, y_offset + j * y_step)` in the final image.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pass {
    pub x_offset: usize,
    pub y_offset: usize,
    pub x_step:   usize,
    pub y_step:   usize,
    pub width:    usize,
    pub height:   usize
}

impl Pass {
    /// A pass with no pixels consumes no bytes
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Position of pass pixel `(i, j)` in the full image
    pub const fn image_position(&self, i: usize, j: usize) -> (usize, usize) {
        (self.x_offset + i * self.x_step, self.y_offset + j * self.y_step)
    }
}

const fn pass_extent(dimension: usize, offset: usize, step: usize) -> usize {
    if dimension <= offset {
        0
    } else {
        (dimension - offset + step - 1) / step
    }
}

/// All passes for an image, in decoding order
///
/// Non-interlaced images get a single pass over every pixel, Adam7 images
/// get seven, some of which may be empty for tiny images.
pub fn passes(width: usize, height: usize, method: InterlaceMethod) -> Vec<Pass> {
    match method {
        InterlaceMethod::Standard => vec![Pass {
            x_offset: 0,
            y_offset: 0,
            x_step: 1,
            y_step: 1,
            width,
            height
        }],
        InterlaceMethod::Adam7 => (0..7)
            .map(|p| Pass {
                x_offset: XORIG[p],
                y_offset: YORIG[p],
                x_step:   XSPC[p],
                y_step:   YSPC[p],
                width:    pass_extent(width, XORIG[p], XSPC[p]),
                height:   pass_extent(height, YORIG[p], YSPC[p])
            })
            .collect()
    }
}
