mod commands;
mod data;
mod frame_name;
mod frames;
mod image;
mod options;
mod sequence;
mod sheet;

use std::process;

use structopt::StructOpt;

use crate::options::Options;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::from_args();

    let build_options = match options.into_build_options() {
        Some(build_options) => build_options,
        None => {
            println!("USAGE build-sprite-sheets <input-folder> <output-folder>");
            println!();

            if let Err(err) = Options::clap().print_help() {
                log::debug!("Could not print help: {}", err);
            }

            println!();
            return;
        }
    };

    if let Err(err) = commands::build_sprite_sheets(build_options) {
        eprintln!("Error: {:?}", err);
        process::exit(1);
    }
}
