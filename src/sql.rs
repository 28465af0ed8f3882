//! Lightweight SQL scanning for `INSERT` scripts.
//!
//! This is intentionally limited compared to a full SQL parser: it only
//! understands enough of the language to pull table names, column lists and
//! value tuples out of `INSERT INTO ... VALUES ...;` statements.
//!
//! The pipeline has three stages:
//! - [`clean_sql`] strips line comments and collapses whitespace.
//! - [`StatementExtractor`] finds the statements in the cleaned text.
//! - [`parse_row`] splits each value tuple into [`Field`]s.

mod lexer;
mod parser;
mod preprocess;
mod row;

pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{
    ExtractOptions, InsertStatement, ParseError, StatementExtractor, extract_statements,
};
pub use preprocess::clean_sql;
pub use row::{Field, NullPolicy, Row, parse_row};
