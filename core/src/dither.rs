//! Reduction of 8-bit grayscale to 1 bit per pixel.

use alloc::vec;

/// How gray values are mapped to black or white.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dither {
    #[default]
    /// Floyd-Steinberg error diffusion, white when the corrected value exceeds 128.
    FloydSteinberg,
    /// White when the value is at least the given threshold.
    Threshold(u8),
}

/// ITU-R 601-2 luma, truncated towards zero.
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Walks `luma` row-major and calls `black(x, y)` for every pixel that ends up black.
pub fn reduce(
    width: usize,
    height: usize,
    luma: &[u8],
    mode: Dither,
    mut black: impl FnMut(usize, usize),
) {
    match mode {
        Dither::Threshold(threshold) => {
            for y in 0..height {
                for x in 0..width {
                    if luma[y * width + x] < threshold {
                        black(x, y);
                    }
                }
            }
        }
        Dither::FloydSteinberg => {
            // Errors are kept in sixteenths, offset by one so x - 1 never underflows.
            let mut current = vec![0i32; width + 2];
            let mut next = vec![0i32; width + 2];
            for y in 0..height {
                for x in 0..width {
                    let value = (luma[y * width + x] as i32 + current[x + 1] / 16).clamp(0, 255);
                    let out = if value > 128 { 255 } else { 0 };
                    if out == 0 {
                        black(x, y);
                    }
                    let error = value - out;
                    current[x + 2] += error * 7;
                    next[x] += error * 3;
                    next[x + 1] += error * 5;
                    next[x + 2] += error;
                }
                core::mem::swap(&mut current, &mut next);
                next.fill(0);
            }
        }
    }
}
