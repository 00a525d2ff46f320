use anyhow::Result;
use log::debug;
use regex::Regex;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod makefile_parser;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Malformed {key} on line {line}: '{value}' is not an integer")]
    MalformedRevision {
        key: &'static str,
        line: usize,
        value: String,
    },
    #[error("Duplicate {key} on lines {first} and {second}")]
    DuplicateRevision {
        key: &'static str,
        first: usize,
        second: usize,
    },
    #[error("Line {line} is not a {key} directive")]
    NotARevision { key: &'static str, line: usize },
    #[error("{key} {value} cannot be incremented")]
    RevisionOverflow { key: &'static str, value: u64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Name,
    Version,
    VersionPrefix,
    DistVersion,
    VersionSuffix,
    Revision,
}

impl DirectiveKind {
    /// Directives a new revision is placed after, in their conventional order
    pub const ORDERING: [DirectiveKind; 5] = [
        DirectiveKind::Name,
        DirectiveKind::Version,
        DirectiveKind::VersionPrefix,
        DirectiveKind::DistVersion,
        DirectiveKind::VersionSuffix,
    ];
}

/// A classified `KEY = value` line split into the parts needed to rewrite its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub kind: DirectiveKind,
    /// Key, assignment operator and surrounding whitespace
    pub head: &'a str,
    pub value: &'a str,
    /// Everything after the value, line terminator included
    pub tail: &'a str,
}

impl Directive<'_> {
    pub fn with_value(&self, value: impl Display) -> String {
        format!("{}{}{}", self.head, value, self.tail)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Change {
    Bumped { from: u64, to: u64 },
    Added { value: u64 },
}

/// Rewritten file contents together with what was changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bump {
    pub contents: String,
    pub change: Change,
}

pub trait Parser {
    /// Computes the new contents of a file: bumps the revision when present, inserts it otherwise
    fn bump(contents: &str) -> Result<Bump> {
        let lines = Self::split_lines(contents);
        let (lines, change) = match Self::locate_revision(&lines)? {
            Some((index, from)) => {
                let to = Self::next_revision(Some(from))?;
                debug!("Bumping {} from {} -> {}", Self::revision_key(), from, to);
                (Self::apply_increment(&lines, index, to)?, Change::Bumped { from, to })
            }
            None => {
                let value = Self::next_revision(None)?;
                debug!("No {} found, inserting {}", Self::revision_key(), value);
                (Self::insert_revision(&lines)?, Change::Added { value })
            }
        };
        Ok(Bump {
            contents: lines.concat(),
            change,
        })
    }

    /// Finds the first revision directive, returning its line index and value
    fn locate_revision(lines: &[&str]) -> Result<Option<(usize, u64)>> {
        let regex = Self::directive_match_regex()?;
        let key = Self::revision_key();
        let mut found: Option<(usize, u64)> = None;

        for (index, line) in lines.iter().enumerate() {
            let Some(directive) = Self::classify(&regex, line) else {
                continue;
            };
            if directive.kind != DirectiveKind::Revision {
                continue;
            }
            if let Some((first, _)) = found {
                return Err(ParsingError::DuplicateRevision {
                    key,
                    first: first + 1,
                    second: index + 1,
                }
                .into());
            }
            let value = parse_revision(directive.value).ok_or_else(|| ParsingError::MalformedRevision {
                key,
                line: index + 1,
                value: directive.value.to_string(),
            })?;
            debug!("Found {} {} on line {}", key, value, index + 1);
            found = Some((index, value));
        }

        Ok(found)
    }

    fn next_revision(current: Option<u64>) -> Result<u64> {
        match current {
            None => Ok(1),
            Some(value) => value.checked_add(1).ok_or_else(|| {
                ParsingError::RevisionOverflow {
                    key: Self::revision_key(),
                    value,
                }
                .into()
            }),
        }
    }

    /// Rewrites the value of the revision directive at `index`, leaving every other line untouched
    fn apply_increment(lines: &[&str], index: usize, revision: u64) -> Result<Vec<String>> {
        let regex = Self::directive_match_regex()?;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| -> Result<String> {
                if i != index {
                    return Ok(line.to_string());
                }
                match Self::classify(&regex, line) {
                    Some(directive) if directive.kind == DirectiveKind::Revision => {
                        Ok(directive.with_value(revision))
                    }
                    _ => Err(ParsingError::NotARevision {
                        key: Self::revision_key(),
                        line: i + 1,
                    }
                    .into()),
                }
            })
            .collect()
    }

    /// Inserts a fresh revision directive after the last of the ordering directives
    fn insert_revision(lines: &[&str]) -> Result<Vec<String>> {
        let index = Self::insertion_index(lines)?;
        let mut result: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        if index == result.len() {
            if let Some(last) = result.last_mut() {
                if !last.ends_with('\n') {
                    last.push('\n');
                }
            }
        }
        result.insert(index, Self::revision_line_format(Self::next_revision(None)?));
        Ok(result)
    }

    /// One past the highest line index among the ordering directives; absent ones count as 0
    fn insertion_index(lines: &[&str]) -> Result<usize> {
        let regex = Self::directive_match_regex()?;
        let classified: Vec<Option<DirectiveKind>> = lines
            .iter()
            .map(|line| Self::classify(&regex, line).map(|directive| directive.kind))
            .collect();

        let last = DirectiveKind::ORDERING
            .iter()
            .map(|kind| {
                classified
                    .iter()
                    .position(|found| found.as_ref() == Some(kind))
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);

        Ok((last + 1).min(lines.len()))
    }

    fn classify<'a>(regex: &Regex, line: &'a str) -> Option<Directive<'a>> {
        let captures = regex.captures(line)?;
        let key = captures.name("key")?.as_str();
        let kind = Self::directive_keys()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| *kind)?;

        Some(Directive {
            kind,
            head: captures.name("head")?.as_str(),
            value: captures.name("value")?.as_str(),
            tail: captures.name("tail")?.as_str(),
        })
    }

    fn split_lines(contents: &str) -> Vec<&str> {
        contents.split_inclusive('\n').collect()
    }

    fn file_path(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(Self::filename())
    }

    fn filename() -> &'static str;
    fn revision_key() -> &'static str;
    fn directive_keys() -> &'static [(&'static str, DirectiveKind)];
    /// Must capture `head` (containing `key`), `value` and `tail`
    fn directive_match_regex() -> Result<Regex>;
    fn revision_line_format(revision: u64) -> String;
}

fn parse_revision(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
