//! Xilinx COE memory initialization files, radix 2.
//!
//! One data entry per bitmap row, black pixels as `1`:
//!
//! ```text
//! memory_initialization_radix=2;
//! memory_initialization_vector=
//! 10,
//! 01
//! ;
//! ```

use alloc::{vec, vec::Vec};

use embedded_io::{Read, Write};
use log::{debug, info};

use crate::{
    bitmap::BitMatrix,
    fs::{File, Filesystem, Mode},
};

const RADIX_KEY: &str = "memory_initialization_radix";
const VECTOR_KEY: &str = "memory_initialization_vector";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    IoError(embedded_io::ErrorKind),
    Utf8Error(core::str::Utf8Error),
    /// The vector started before any radix was declared.
    MissingRadix,
    UnsupportedRadix,
    MissingVector,
    /// A vector entry holds something other than `0` or `1`.
    InvalidDigit { line: usize },
    /// A vector entry differs in width from the first entry.
    RaggedRows { line: usize },
    /// Neither a comment nor a `key=value;` statement.
    UnexpectedLine { line: usize },
    /// The vector is not closed by `;`.
    MissingTerminator,
}

impl Error {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        Error::IoError(error.kind())
    }

    pub(crate) fn from_read_exact_error<E: embedded_io::Error>(
        error: embedded_io::ReadExactError<E>,
    ) -> Self {
        match error {
            embedded_io::ReadExactError::UnexpectedEof => {
                Error::IoError(embedded_io::ErrorKind::InvalidData)
            }
            embedded_io::ReadExactError::Other(e) => Error::from_io_error(e),
        }
    }
}

impl From<core::str::Utf8Error> for Error {
    fn from(err: core::str::Utf8Error) -> Self {
        Error::Utf8Error(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::IoError(kind) => write!(f, "I/O error: {kind:?}"),
            Error::Utf8Error(err) => write!(f, "not UTF-8: {err}"),
            Error::MissingRadix => write!(f, "no {RADIX_KEY} before the vector"),
            Error::UnsupportedRadix => write!(f, "only {RADIX_KEY}=2 is supported"),
            Error::MissingVector => write!(f, "no {VECTOR_KEY} found"),
            Error::InvalidDigit { line } => write!(f, "line {line}: expected 0 or 1"),
            Error::RaggedRows { line } => {
                write!(f, "line {line}: entry width differs from the first entry")
            }
            Error::UnexpectedLine { line } => write!(f, "line {line}: expected key=value;"),
            Error::MissingTerminator => write!(f, "vector is not terminated by ';'"),
        }
    }
}

type Result<T> = core::result::Result<T, Error>;

/// Writes `matrix` as a radix-2 COE document. Every row but the last is
/// followed by a comma, and the document ends in a bare `;`.
///
/// Failures are the writer's own errors, so callers keep the full cause.
pub fn write<W: Write>(out: &mut W, matrix: &BitMatrix) -> core::result::Result<(), W::Error> {
    out.write_all(RADIX_KEY.as_bytes())?;
    out.write_all(b"=2;\n")?;
    out.write_all(VECTOR_KEY.as_bytes())?;
    out.write_all(b"=\n")?;

    let height = matrix.height();
    let mut line = Vec::with_capacity(matrix.width() + 2);
    for y in 0..height {
        line.clear();
        line.extend(matrix.row(y).map(|black| if black { b'1' } else { b'0' }));
        if y + 1 < height {
            line.push(b',');
        }
        line.push(b'\n');
        out.write_all(&line)?;
    }

    out.write_all(b";")?;
    out.flush()?;
    debug!("Wrote COE vector: {}x{}", matrix.width(), height);
    Ok(())
}

/// Reads a whole COE file and parses it.
pub fn load<FS: Filesystem>(fs: &FS, path: &str) -> Result<BitMatrix> {
    let mut file = fs.open_file(path, Mode::Read).map_err(Error::from_io_error)?;
    let mut data = vec![0u8; file.size()];
    file.read_exact(&mut data)
        .map_err(Error::from_read_exact_error)?;
    let text = core::str::from_utf8(&data)?;
    let matrix = parse(text)?;
    info!(
        "Loaded {}x{} COE from {}",
        matrix.width(),
        matrix.height(),
        path
    );
    Ok(matrix)
}

/// Parses a radix-2 COE document.
///
/// Lines starting with `;` before the vector are comments. Vector entries may
/// be separated by commas, whitespace or both; everything after the closing
/// `;` is ignored.
pub fn parse(text: &str) -> Result<BitMatrix> {
    let mut radix_seen = false;
    let mut rows: Vec<Vec<bool>> = Vec::new();
    let mut width = None;
    let mut current: Vec<bool> = Vec::new();
    let mut in_vector = false;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut rest = raw.trim();

        if !in_vector {
            if rest.is_empty() || rest.starts_with(';') {
                continue;
            }
            let (key, value) = rest
                .split_once('=')
                .ok_or(Error::UnexpectedLine { line: line_no })?;
            match key.trim() {
                RADIX_KEY => {
                    let (value, _) = value
                        .split_once(';')
                        .ok_or(Error::UnexpectedLine { line: line_no })?;
                    if value.trim() != "2" {
                        return Err(Error::UnsupportedRadix);
                    }
                    radix_seen = true;
                    continue;
                }
                VECTOR_KEY => {
                    if !radix_seen {
                        return Err(Error::MissingRadix);
                    }
                    in_vector = true;
                    rest = value;
                }
                _ => return Err(Error::UnexpectedLine { line: line_no }),
            }
        }

        for c in rest.chars() {
            match c {
                '0' | '1' => current.push(c == '1'),
                ',' | ';' => {
                    finish_entry(&mut rows, &mut current, &mut width, line_no)?;
                    if c == ';' {
                        return Ok(build(rows, width.unwrap_or(0)));
                    }
                }
                c if c.is_whitespace() => {
                    finish_entry(&mut rows, &mut current, &mut width, line_no)?;
                }
                _ => return Err(Error::InvalidDigit { line: line_no }),
            }
        }
        // a line break also ends an entry
        finish_entry(&mut rows, &mut current, &mut width, line_no)?;
    }

    if in_vector {
        Err(Error::MissingTerminator)
    } else {
        Err(Error::MissingVector)
    }
}

fn finish_entry(
    rows: &mut Vec<Vec<bool>>,
    current: &mut Vec<bool>,
    width: &mut Option<usize>,
    line: usize,
) -> Result<()> {
    if current.is_empty() {
        return Ok(());
    }
    match *width {
        None => *width = Some(current.len()),
        Some(w) if w != current.len() => return Err(Error::RaggedRows { line }),
        Some(_) => {}
    }
    rows.push(core::mem::take(current));
    Ok(())
}

fn build(rows: Vec<Vec<bool>>, width: usize) -> BitMatrix {
    BitMatrix::from_fn(width, rows.len(), |x, y| rows[y][x])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use embedded_graphics::{
        pixelcolor::BinaryColor,
        prelude::*,
        primitives::{Circle, PrimitiveStyle},
    };

    fn encode(matrix: &BitMatrix) -> String {
        let mut out = Vec::new();
        write(&mut out, matrix).unwrap();
        String::from_utf8(out).unwrap()
    }

    struct FullDevice {
        room: usize,
    }

    impl embedded_io::ErrorType for FullDevice {
        type Error = embedded_io::ErrorKind;
    }

    impl Write for FullDevice {
        fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
            if self.room == 0 {
                return Err(embedded_io::ErrorKind::OutOfMemory);
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn write_passes_through_writer_error() {
        let matrix = BitMatrix::from_fn(8, 8, |x, y| x == y);
        let mut device = FullDevice { room: 70 };
        assert_eq!(
            write(&mut device, &matrix),
            Err(embedded_io::ErrorKind::OutOfMemory)
        );
    }

    #[test]
    fn checkerboard_2x2() {
        let matrix = BitMatrix::from_fn(2, 2, |x, y| x == y);
        assert_eq!(
            encode(&matrix),
            "memory_initialization_radix=2;\nmemory_initialization_vector=\n10,\n01\n;"
        );
    }

    #[test]
    fn single_black_pixel() {
        let matrix = BitMatrix::from_fn(1, 1, |_, _| true);
        assert_eq!(
            encode(&matrix),
            "memory_initialization_radix=2;\nmemory_initialization_vector=\n1\n;"
        );
    }

    #[test]
    fn empty_matrix_has_only_header_and_terminator() {
        let matrix = BitMatrix::new(4, 0);
        assert_eq!(
            encode(&matrix),
            "memory_initialization_radix=2;\nmemory_initialization_vector=\n;"
        );
    }

    #[test]
    fn line_shape_matches_dimensions() {
        let mut matrix = BitMatrix::new(37, 11);
        Circle::new(Point::new(3, 0), 10)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut matrix)
            .unwrap();
        let text = encode(&matrix);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "memory_initialization_radix=2;");
        assert_eq!(lines[1], "memory_initialization_vector=");
        assert_eq!(*lines.last().unwrap(), ";");
        let data = &lines[2..lines.len() - 1];
        assert_eq!(data.len(), 11);
        for (y, line) in data.iter().enumerate() {
            let bits = if y + 1 < data.len() {
                line.strip_suffix(',').unwrap()
            } else {
                assert!(!line.ends_with(','));
                line
            };
            assert_eq!(bits.len(), 37);
            assert!(bits.chars().all(|c| c == '0' || c == '1'));
        }
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn parse_reads_back_written_matrix() {
        let mut matrix = BitMatrix::new(19, 7);
        Circle::new(Point::new(2, 0), 7)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut matrix)
            .unwrap();
        assert_eq!(parse(&encode(&matrix)).unwrap(), matrix);
    }

    #[test]
    fn parse_accepts_comments_and_loose_layout() {
        let text = "; generated by hand\n\
                    memory_initialization_radix = 2 ;\n\
                    memory_initialization_vector=101, 010,\n\
                    111 ;trailing comment\n";
        let matrix = parse(text).unwrap();
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.height(), 3);
        assert!(matrix.get(0, 0) && !matrix.get(1, 0) && matrix.get(2, 0));
        assert_eq!(matrix.count_black(), 6);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse("memory_initialization_radix=16;\nmemory_initialization_vector=\nff;"),
            Err(Error::UnsupportedRadix)
        );
        assert_eq!(
            parse("memory_initialization_vector=\n1;"),
            Err(Error::MissingRadix)
        );
        assert_eq!(
            parse("memory_initialization_radix=2;\n"),
            Err(Error::MissingVector)
        );
        assert_eq!(
            parse("memory_initialization_radix=2;\nmemory_initialization_vector=\n10,\n01\n"),
            Err(Error::MissingTerminator)
        );
        assert_eq!(
            parse("memory_initialization_radix=2;\nmemory_initialization_vector=\n10,\n012\n;"),
            Err(Error::InvalidDigit { line: 4 })
        );
        assert_eq!(
            parse("memory_initialization_radix=2;\nmemory_initialization_vector=\n10,\n011\n;"),
            Err(Error::RaggedRows { line: 4 })
        );
        assert_eq!(
            parse("hello\n"),
            Err(Error::UnexpectedLine { line: 1 })
        );
    }
}
