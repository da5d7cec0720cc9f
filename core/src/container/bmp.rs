//! Just enough of the Windows BMP header to tell colour-indexed images apart
//! from grayscale ones. Pixel data is left to the image decoder.

use alloc::{vec, vec::Vec};

use embedded_io::Read;
use log::debug;

use crate::fs::File;

const BMP_MAGIC: &[u8; 2] = b"BM";
const FILE_HEADER_SIZE: usize = 14;
const CORE_HEADER_SIZE: usize = 12;
const INFO_HEADER_SIZE: usize = 40;
/// File header, the largest (V5) info header and a full 256 entry palette.
const MAX_HEADER_LEN: usize = FILE_HEADER_SIZE + 124 + 256 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    IoError(embedded_io::ErrorKind),
    InvalidSignature,
    /// The header or palette runs past the end of the data.
    Truncated,
    UnsupportedHeader,
}

impl Error {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        Error::IoError(error.kind())
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::IoError(kind) => write!(f, "I/O error: {kind:?}"),
            Error::InvalidSignature => write!(f, "not a BMP file"),
            Error::Truncated => write!(f, "BMP header is truncated"),
            Error::UnsupportedHeader => write!(f, "unsupported BMP header"),
        }
    }
}

type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub bits_per_pixel: u16,
    /// RGB entries, empty for true-colour images.
    pub palette: Vec<[u8; 3]>,
}

impl Header {
    /// A palette counts as gray when entry `i` is `(i, i, i)`, or for two
    /// colours when it is exactly black then white.
    pub fn has_gray_palette(&self) -> bool {
        let count = self.palette.len();
        self.palette.iter().enumerate().all(|(i, rgb)| {
            let v = if count == 2 { (i * 255) as u8 } else { i as u8 };
            *rgb == [v, v, v]
        })
    }

    /// Indexed image whose palette is not plain gray.
    pub fn is_indexed_color(&self) -> bool {
        !self.palette.is_empty() && !self.has_gray_palette()
    }
}

fn le_u16(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = data.get(offset..offset + 2).ok_or(Error::Truncated)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn le_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data.get(offset..offset + 4).ok_or(Error::Truncated)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn parse_header(data: &[u8]) -> Result<Header> {
    if data.len() < FILE_HEADER_SIZE || &data[..2] != BMP_MAGIC {
        return Err(Error::InvalidSignature);
    }
    let dib_size = le_u32(data, FILE_HEADER_SIZE)? as usize;
    // OS/2 core headers store BGR triplets, everything newer BGRA quads
    let (bits_per_pixel, colors_used, entry_size) = match dib_size {
        CORE_HEADER_SIZE => (le_u16(data, FILE_HEADER_SIZE + 10)?, 0, 3),
        size if size >= INFO_HEADER_SIZE => (
            le_u16(data, FILE_HEADER_SIZE + 14)?,
            le_u32(data, FILE_HEADER_SIZE + 32)? as usize,
            4,
        ),
        _ => return Err(Error::UnsupportedHeader),
    };

    let mut palette = Vec::new();
    if matches!(bits_per_pixel, 1 | 2 | 4 | 8) {
        let count = if colors_used == 0 {
            1 << bits_per_pixel
        } else {
            colors_used
        };
        if count > 256 {
            return Err(Error::UnsupportedHeader);
        }
        let start = FILE_HEADER_SIZE + dib_size;
        for i in 0..count {
            let offset = start + i * entry_size;
            let bgr = data.get(offset..offset + 3).ok_or(Error::Truncated)?;
            palette.push([bgr[2], bgr[1], bgr[0]]);
        }
    }
    debug!(
        "Parsed BMP header: {} bpp, {} palette entries",
        bits_per_pixel,
        palette.len()
    );
    Ok(Header {
        bits_per_pixel,
        palette,
    })
}

/// Reads the leading header bytes of `file` and parses them.
pub fn read_header(file: &mut impl File) -> Result<Header> {
    let mut data = vec![0u8; file.size().min(MAX_HEADER_LEN)];
    file.read_exact(&mut data).map_err(|err| match err {
        embedded_io::ReadExactError::UnexpectedEof => Error::Truncated,
        embedded_io::ReadExactError::Other(e) => Error::from_io_error(e),
    })?;
    parse_header(&data)
}
