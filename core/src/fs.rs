use embedded_io::{ErrorType, Read, Seek, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    /// Create if missing, truncate if present.
    Write,
    ReadWrite,
}

pub trait File: Read + Write + Seek {
    fn size(&self) -> usize;
}

pub trait Filesystem: ErrorType {
    type File: File;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File, Self::Error>;
    fn exists(&self, path: &str) -> Result<bool, Self::Error>;
}
