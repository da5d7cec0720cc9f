use std::process::ExitCode;

use argh::FromArgs;
use coe_desktop::{
    convert::{self, DEFAULT_COE_PATH, DEFAULT_RENDER_PATH},
    std_fs::StdFilesystem,
};
use log::error;

#[derive(FromArgs)]
/// Render a radix-2 COE file back to a black and white image
struct Args {
    /// input COE file path
    #[argh(option, short = 'i', default = "DEFAULT_COE_PATH.into()")]
    input: String,

    /// output image path, format taken from the extension
    #[argh(option, short = 'o', default = "DEFAULT_RENDER_PATH.into()")]
    output: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let fs = StdFilesystem::new_with_base_path(".".into());
    match convert::coe_to_image(&fs, &args.input, &args.output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
