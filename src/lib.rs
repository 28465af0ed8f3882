#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod changelog;
pub mod convert;
pub mod errors;
pub mod sql;

// Re-export main types
pub use changelog::{ChangeLog, ChangeLogConfig, Column, Record};
pub use convert::{Conversion, ConvertOptions, Converter, Summary};
pub use sql::{ExtractOptions, Field, InsertStatement, NullPolicy, Row};

// Re-export errors
pub use errors::Error;
pub use sql::{LexerError, ParseError};
