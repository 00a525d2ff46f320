use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("no arguments given")]
    NoArguments,
}

#[derive(Debug, Parser)]
#[command(version, about, bin_name = "bump_revision")]
pub struct Arguments {
    /// Port directories whose Makefile should get its PORTREVISION bumped,
    /// usually relative to a ports tree checkout (e.g. devel/cmake)
    pub paths: Vec<PathBuf>,
}

impl Arguments {
    /// Returns the directories to process, or a usage error when none were given
    pub fn directories(&self) -> Result<&[PathBuf], ArgumentError> {
        if self.paths.is_empty() {
            return Err(ArgumentError::NoArguments);
        }
        Ok(&self.paths)
    }
}
