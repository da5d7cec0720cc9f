use std::path::Path;

use coe_core::{
    bitmap::BitMatrix,
    container::{bmp, coe},
    dither::{self, Dither},
    fs::{Filesystem, Mode},
};
use image::{GrayImage, Luma};
use log::{debug, info};

use crate::{Error, Result, std_fs::StdFilesystem};

pub const DEFAULT_BMP_PATH: &str = "scripts/attachments/title.bmp";
pub const DEFAULT_COE_PATH: &str = "scripts/attachments/title.coe";
pub const DEFAULT_RENDER_PATH: &str = "scripts/attachments/title_render.bmp";

/// Decodes any supported image and reduces it to one bit per pixel.
/// Alpha is dropped and color is weighted with ITU-R 601-2 luma.
pub fn decode(path: &Path, mode: Dither) -> Result<BitMatrix> {
    let image = image::open(path).map_err(Error::Decode)?.into_rgb8();
    let (width, height) = image.dimensions();
    info!("Decoded {}: {}x{}", path.display(), width, height);

    let luma: Vec<u8> = image
        .pixels()
        .map(|px| dither::luma_601(px[0], px[1], px[2]))
        .collect();
    BitMatrix::from_luma(width as usize, height as usize, &luma, mode).map_err(Error::Bitmap)
}

/// Colour-indexed BMPs are thresholded per palette entry instead of dithered.
/// Gray palettes and true-colour images keep `requested`, as does an explicit
/// threshold.
pub fn coercion_for(fs: &StdFilesystem, input: &str, requested: Dither) -> Dither {
    if requested != Dither::FloydSteinberg {
        return requested;
    }
    let Ok(mut file) = fs.open_file(input, Mode::Read) else {
        return requested;
    };
    match bmp::read_header(&mut file) {
        Ok(header) if header.is_indexed_color() => {
            info!(
                "{} uses a {} colour palette, thresholding instead of dithering",
                input,
                header.palette.len()
            );
            Dither::Threshold(128)
        }
        Ok(_) => requested,
        Err(err) => {
            debug!("{}: no BMP palette ({})", input, err);
            requested
        }
    }
}

/// Converts the bitmap at `input` to a COE file at `output`.
///
/// The input is fully decoded before the output is opened, so a bad input
/// leaves an existing output untouched.
pub fn bmp_to_coe(
    fs: &StdFilesystem,
    input: &str,
    output: &str,
    mode: Dither,
) -> Result<BitMatrix> {
    let mode = coercion_for(fs, input, mode);
    let matrix = decode(&fs.resolve(input), mode)?;

    if fs.exists(output).unwrap_or(false) {
        info!("Overwriting {}", output);
    }
    let mut file = fs.open_file(output, Mode::Write).map_err(Error::Write)?;
    coe::write(&mut file, &matrix).map_err(Error::Write)?;

    info!(
        "Wrote {}: {} rows of {} bits, {} black",
        output,
        matrix.height(),
        matrix.width(),
        matrix.count_black()
    );
    Ok(matrix)
}

/// Black for set bits, white otherwise.
pub fn render(matrix: &BitMatrix) -> GrayImage {
    GrayImage::from_fn(matrix.width() as u32, matrix.height() as u32, |x, y| {
        if matrix.get(x as usize, y as usize) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Reads the COE file at `input` and saves it as an image, format picked
/// from the extension of `output`.
pub fn coe_to_image(fs: &StdFilesystem, input: &str, output: &str) -> Result<BitMatrix> {
    let matrix = coe::load(fs, input).map_err(Error::Coe)?;
    render(&matrix)
        .save(fs.resolve(output))
        .map_err(Error::Render)?;
    info!(
        "Rendered {}x{} to {}",
        matrix.width(),
        matrix.height(),
        output
    );
    Ok(matrix)
}
