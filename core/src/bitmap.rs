use alloc::{vec, vec::Vec};

use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

use crate::dither::{self, Dither};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Pixel buffer length does not equal `width * height`.
    SizeMismatch { expected: usize, actual: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels, got {actual}")
            }
        }
    }
}

type Result<T> = core::result::Result<T, Error>;

/// A 1-bit pixel grid. A set bit is a black pixel.
///
/// Rows are packed MSB-first and padded to a whole byte, so a row of width 10
/// occupies two bytes with the low six bits of the second byte unused.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// All-white matrix.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height],
        }
    }

    pub fn from_fn(
        width: usize,
        height: usize,
        mut black: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let mut matrix = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if black(x, y) {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }

    /// Reduce an 8-bit grayscale buffer (row-major, `width * height` bytes) to
    /// one bit per pixel.
    pub fn from_luma(width: usize, height: usize, luma: &[u8], mode: Dither) -> Result<Self> {
        let expected = width * height;
        if luma.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: luma.len(),
            });
        }
        let mut matrix = Self::new(width, height);
        dither::reduce(width, height, luma, mode, |x, y| matrix.set(x, y, true));
        Ok(matrix)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` for a black pixel. Out of range coordinates read as white.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte_index = y * self.stride + x / 8;
        let bit_index = 7 - (x % 8);
        (self.data[byte_index] >> bit_index) & 1 == 1
    }

    /// Out of range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let byte_index = y * self.stride + x / 8;
        let bit_index = 7 - (x % 8);
        if black {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Packed bytes of row `y`, including the padding bits. Empty when `y` is
    /// out of range.
    pub fn row_bytes(&self, y: usize) -> &[u8] {
        if y >= self.height {
            return &[];
        }
        &self.data[y * self.stride..(y + 1) * self.stride]
    }

    /// Iterates the pixels of row `y` from left to right.
    pub fn row(&self, y: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.width).map(move |x| self.get(x, y))
    }

    pub fn count_black(&self) -> usize {
        (0..self.height)
            .map(|y| self.row(y).filter(|&black| black).count())
            .sum()
    }
}

impl core::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "BitMatrix {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            for black in self.row(y) {
                f.write_str(if black { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl OriginDimensions for BitMatrix {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for BitMatrix {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set(coord.x as usize, coord.y as usize, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.data.fill(fill);
        if color.is_on() && self.width % 8 != 0 {
            // keep padding bits zero so equality only depends on pixels
            let mask = 0xFFu8 << (8 - self.width % 8);
            for y in 0..self.height {
                self.data[y * self.stride + self.stride - 1] &= mask;
            }
        }
        Ok(())
    }
}
