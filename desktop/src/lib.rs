use std::fmt;

use coe_core::{bitmap, container::coe};

pub mod convert;
pub mod std_fs;

#[derive(Debug)]
pub enum Error {
    /// Input missing, unreadable or not a decodable image.
    Decode(image::ImageError),
    /// Output could not be created, truncated or written.
    Write(std::io::Error),
    /// Reading a COE document failed.
    Coe(coe::Error),
    Bitmap(bitmap::Error),
    /// The rendered image could not be encoded or saved.
    Render(image::ImageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(err) => write!(f, "failed to decode input image: {err}"),
            Error::Write(err) => write!(f, "failed to write output file: {err}"),
            Error::Coe(err) => write!(f, "COE error: {err}"),
            Error::Bitmap(err) => write!(f, "bitmap error: {err}"),
            Error::Render(err) => write!(f, "failed to save rendered image: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(err) | Error::Render(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Coe(_) | Error::Bitmap(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
