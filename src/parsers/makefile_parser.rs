use crate::parsers::{DirectiveKind, Parser};
use regex::Regex;

/// FreeBSD ports `Makefile`
pub struct MakefileParser;

impl Parser for MakefileParser {
    fn filename() -> &'static str {
        "Makefile"
    }

    fn revision_key() -> &'static str {
        "PORTREVISION"
    }

    fn directive_keys() -> &'static [(&'static str, DirectiveKind)] {
        &[
            ("PORTNAME", DirectiveKind::Name),
            ("PORTVERSION", DirectiveKind::Version),
            ("DISTVERSIONPREFIX", DirectiveKind::VersionPrefix),
            ("DISTVERSION", DirectiveKind::DistVersion),
            ("DISTVERSIONSUFFIX", DirectiveKind::VersionSuffix),
            ("PORTREVISION", DirectiveKind::Revision),
        ]
    }

    fn directive_match_regex() -> anyhow::Result<Regex> {
        Ok(Regex::new(
            r"(?s)^(?P<head>(?P<key>[A-Z][A-Z0-9_]*)[ \t]*[?:+!]?=[ \t]*)(?P<value>[^\s#]*)(?P<tail>.*)$",
        )?)
    }

    fn revision_line_format(revision: u64) -> String {
        format!("{}=\t{}\n", Self::revision_key(), revision)
    }
}
