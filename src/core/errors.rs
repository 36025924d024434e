use std::path::PathBuf;
use thiserror::Error;

/// A probe that could not be started or waited on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{program}: {message}")]
pub struct ExecError {
    pub program: String,
    pub message: String,
}

impl ExecError {
    pub fn new(program: impl Into<String>, message: impl ToString) -> Self {
        Self {
            program: program.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("cannot read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record {line}: expected 3 fields (user, password, host[:port]), found {found}")]
    MalformedRecord { line: u64, found: usize },

    #[error("invalid csv input: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot open output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write result: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CheckerError>;
