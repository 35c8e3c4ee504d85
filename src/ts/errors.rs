use crate::tree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at line {line}, column {column} (bytes {byte_start}..{byte_end})")]
    Syntax {
        byte_start: usize,
        byte_end: usize,
        line: usize,
        column: usize,
    },

    #[error("multiple syntax errors detected: {count} ERROR nodes, first at line {first_line}")]
    MultipleSyntaxErrors { count: usize, first_line: usize },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tree construction failed: {0}")]
    Tree(#[from] TreeError),
}
