use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::fluent::{EntryKind, Span};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("line {line}: unknown keyword '{keyword}'")]
    UnknownKeyword { line: usize, keyword: String },

    #[error("line {line}: expected a quoted string")]
    ExpectedString { line: usize },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: string continuation without an open field")]
    OrphanString { line: usize },

    #[error("line {line}: msgstr without msgid")]
    MissingMsgid { line: usize },

    #[error("line {line}: invalid plural index '{index}'")]
    InvalidPluralIndex { line: usize, index: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("unhandled Fluent type {kind}{}", describe_span(.span))]
    UnsupportedEntry { kind: EntryKind, span: Option<Span> },
}

fn describe_span(span: &Option<Span>) -> String {
    match span {
        Some(s) => format!(" at bytes {}..{}", s.start, s.end),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error(transparent)]
    Merge(#[from] MergeError),
}
