use crate::parsers::{Change, Parser};
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to a single directory argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Bumped { file: PathBuf, from: u64, to: u64 },
    Added { file: PathBuf, directive: String },
    NotADirectory(PathBuf),
    MissingFile(PathBuf),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Bumped { file, from, to } => {
                write!(f, "bumping {} from {} to {}", file.display(), from, to)
            }
            Outcome::Added { file, directive } => {
                write!(f, "adding {} to {}", directive, file.display())
            }
            Outcome::NotADirectory(dir) => write!(f, "{} is not a directory, skipping", dir.display()),
            Outcome::MissingFile(dir) => write!(f, "skipping {}", dir.display()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Bumps the revision in `dir`'s metadata file, rewriting it in place.
///
/// Non-directories and directories without the file are skipped without touching the filesystem.
pub fn process<P: Parser>(dir: impl AsRef<Path>) -> Result<Outcome> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(Outcome::NotADirectory(dir.to_path_buf()));
    }

    let file = P::file_path(dir);
    if !file.exists() {
        return Ok(Outcome::MissingFile(dir.to_path_buf()));
    }

    debug!("Reading file: '{}'", file.display());
    let contents = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let bump = P::bump(&contents).with_context(|| format!("Failed to parse {}", file.display()))?;
    std::fs::write(&file, &bump.contents)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    debug!("Wrote file: '{}'", file.display());

    Ok(match bump.change {
        Change::Bumped { from, to } => Outcome::Bumped { file, from, to },
        Change::Added { value } => Outcome::Added {
            file,
            directive: format!("{}={}", P::revision_key(), value),
        },
    })
}

/// Processes every directory in order, reporting each outcome as it happens.
///
/// A failing directory is logged and recorded; the remaining directories are still processed.
pub fn run<P: Parser>(paths: &[PathBuf]) -> RunSummary {
    let mut summary = RunSummary::default();

    for path in paths {
        match process::<P>(path) {
            Ok(outcome) => {
                match &outcome {
                    Outcome::NotADirectory(_) => info!("{}", outcome),
                    _ => println!("{}", outcome),
                }
                summary.outcomes.push(outcome);
            }
            Err(err) => {
                error!("{}: {:#}", path.display(), err);
                summary.failures.push((path.clone(), err));
            }
        }
    }

    if !summary.is_success() {
        error!("{} of {} directories failed", summary.failures.len(), paths.len());
    }

    summary
}
