//! Submodule defining the errors used across the crate.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use crate::sql::{LexerError, ParseError};

/// Errors that can occur while converting a script.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input script does not exist.
    #[error("Input file '{}' not found", path.display())]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// The input script is not valid UTF-8.
    #[error("Input file '{}' is not valid UTF-8", path.display())]
    Encoding {
        /// The offending path.
        path: PathBuf,
        /// The underlying decoding error.
        #[source]
        source: FromUtf8Error,
    },
    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A statement did not match the supported INSERT grammar (strict mode).
    #[error("Malformed statement: {0}")]
    MalformedStatement(#[from] ParseError),
    /// A value tuple could not be split into fields.
    #[error("Malformed value tuple in table '{table}': {source}")]
    Row {
        /// The target table.
        table: String,
        /// The underlying lexer error.
        #[source]
        source: LexerError,
    },
    /// A row has a different number of values than declared columns (strict mode).
    #[error("Table '{table}' declares {columns} columns but a row has {values} values")]
    ColumnCountMismatch {
        /// The target table.
        table: String,
        /// Number of declared columns.
        columns: usize,
        /// Number of parsed values.
        values: usize,
    },
    /// Writing the CSV dump failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
