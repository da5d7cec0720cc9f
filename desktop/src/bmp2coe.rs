use std::process::ExitCode;

use argh::FromArgs;
use coe_core::dither::Dither;
use coe_desktop::{
    convert::{self, DEFAULT_BMP_PATH, DEFAULT_COE_PATH},
    std_fs::StdFilesystem,
};
use log::{error, warn};

#[derive(FromArgs)]
/// Convert a black and white bitmap into a radix-2 COE memory initialization file
struct Args {
    /// input image path
    #[argh(option, short = 'i', default = "DEFAULT_BMP_PATH.into()")]
    input: String,

    /// output COE file path
    #[argh(option, short = 'o', default = "DEFAULT_COE_PATH.into()")]
    output: String,

    /// plain luma threshold instead of Floyd-Steinberg dithering
    #[argh(option, short = 't')]
    threshold: Option<u8>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match std::env::current_dir() {
        Ok(cwd) => println!("Current working directory: {}", cwd.display()),
        Err(err) => warn!("Failed to get current working directory: {err}"),
    }

    let mode = args.threshold.map_or(Dither::FloydSteinberg, Dither::Threshold);
    let fs = StdFilesystem::new_with_base_path(".".into());
    match convert::bmp_to_coe(&fs, &args.input, &args.output, mode) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
