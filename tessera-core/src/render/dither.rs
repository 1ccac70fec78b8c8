//! Grayscale to binary quantization
//!
//! Three policies, selected per window by [`DitherMode`]:
//! - None: any non-zero value is on
//! - Ordered: threshold against a repeating 4x4 Bayer matrix
//! - Error diffusion: Floyd-Steinberg, propagating the rounding error
//!   into the not-yet-visited neighbors of the same buffer

use crate::window::DitherMode;

/// 4x4 Bayer threshold matrix, indexed `[y & 3][x & 3]`
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 128, 32, 160],
    [192, 64, 224, 96],
    [48, 176, 16, 144],
    [240, 112, 208, 80],
];

/// Error diffusion on/off threshold
pub const DIFFUSION_THRESHOLD: u8 = 127;

/// Undithered conversion
#[inline]
pub fn plain(value: u8) -> bool {
    value != 0
}

/// Ordered (Bayer) conversion
///
/// Pure function of `value`, `x & 3` and `y & 3`.
#[inline]
pub fn ordered(value: u8, x: usize, y: usize) -> bool {
    value > BAYER_4X4[y & 3][x & 3]
}

/// Floyd-Steinberg conversion of the pixel at `(x, y)`
///
/// Quantizes the pixel and adds 7/16, 3/16, 5/16 and 1/16 of the error to
/// the right, below-left, below and below-right neighbors (skipping any
/// outside the buffer). `pixels` is a `width`-wide raster; the neighbor
/// updates are permanent, so a buffer dithered twice without fresh
/// content drifts.
pub fn diffuse(pixels: &mut [u8], width: usize, height: usize, x: usize, y: usize) -> bool {
    let idx = x + y * width;
    let value = pixels[idx];
    let on = value > DIFFUSION_THRESHOLD;
    let error = value as i16 - if on { 255 } else { 0 };

    if error == 0 {
        return on;
    }

    if x + 1 < width {
        spread(&mut pixels[idx + 1], error * 7);
    }
    if y + 1 < height {
        let below = idx + width;
        if x > 0 {
            spread(&mut pixels[below - 1], error * 3);
        }
        spread(&mut pixels[below], error * 5);
        if x + 1 < width {
            spread(&mut pixels[below + 1], error);
        }
    }

    on
}

/// Add `weighted >> 4` to a pixel, saturating at the byte range
#[inline]
fn spread(pixel: &mut u8, weighted: i16) {
    let next = *pixel as i16 + (weighted >> 4);
    *pixel = next.clamp(0, 255) as u8;
}

/// Quantize one pixel of a window buffer according to `mode`
///
/// `x`/`y` are window-local coordinates.
#[inline]
pub fn quantize(
    mode: DitherMode,
    pixels: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> bool {
    match mode {
        DitherMode::None => plain(pixels[x + y * width]),
        DitherMode::Ordered => ordered(pixels[x + y * width], x, y),
        DitherMode::ErrorDiffusion => diffuse(pixels, width, height, x, y),
    }
}
