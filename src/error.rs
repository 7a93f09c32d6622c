//! Error types for bit array operations and the `bitcomb` tool.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for `bitcomb` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bit index {index} is out of range for a bit array of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("bit arrays occupy different numbers of words ({left} and {right})")]
    WordCountMismatch { left: usize, right: usize },

    #[error("operation `{0}` needs two operands")]
    MissingOperand(String),

    #[error("combination size {k} exceeds universe size {n}")]
    CombinationSize { n: usize, k: usize },

    #[error("no bit strings found in input")]
    EmptyInput,

    #[error("failed to read bit strings: {0}")]
    ReadInput(#[source] io::Error),

    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),

    #[error("failed to read bit dump from '{path}': {source}")]
    DumpRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write bit dump to '{path}': {source}")]
    DumpWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report to '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
