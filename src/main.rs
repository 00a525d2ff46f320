use bump_revision::{arguments::Arguments, bumper, parsers::makefile_parser::MakefileParser};
use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Arguments::parse();
    pretty_env_logger::env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let directories = match args.directories() {
        Ok(directories) => directories,
        Err(err) => {
            println!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if bumper::run::<MakefileParser>(directories).is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
