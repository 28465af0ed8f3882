//! Extraction of `INSERT INTO ... VALUES ...;` statements from a script.
//!
//! The supported grammar is deliberately small:
//!
//! ```text
//! INSERT INTO <name> ( <column> [, <column>]* ) VALUES <tuple> [, <tuple>]* ;
//! ```
//!
//! Anything in between statements (DDL, `UPDATE`s, `INSERT ... SELECT`, ...)
//! is ignored. Candidates are found by walking tokens, so quoted text never
//! starts a statement. In lenient mode a candidate that does not fit the
//! grammar is skipped and scanning resumes right after its `INSERT` keyword.

use core::ops::Range;

use super::lexer::{Lexer, LexerError, Token, TokenKind};
use super::row::{Row, parse_row};

/// Options controlling statement extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Match `INSERT`, `INTO` and `VALUES` regardless of case.
    pub ignore_keyword_case: bool,
    /// Report malformed statements instead of skipping them.
    pub strict: bool,
}

impl ExtractOptions {
    fn matches_keyword(self, word: &str, keyword: &str) -> bool {
        if self.ignore_keyword_case {
            word.eq_ignore_ascii_case(keyword)
        } else {
            word == keyword
        }
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    /// Table name, without any schema prefix.
    pub table_name: String,
    /// Schema prefix of the table name, if one was given.
    pub schema: Option<String>,
    /// Column names, quotes stripped.
    pub columns: Vec<String>,
    /// Source text from the first tuple's `(` to the last tuple's `)`.
    pub raw_values_block: String,
    /// Spans of each tuple's inner text within `raw_values_block`.
    tuple_spans: Vec<Range<usize>>,
}

impl InsertStatement {
    /// Returns the inner text of every value tuple, in source order.
    #[must_use]
    pub fn tuples(&self) -> Vec<&str> {
        self.tuple_spans
            .iter()
            .map(|span| &self.raw_values_block[span.clone()])
            .collect()
    }

    /// Parse every value tuple into a [`Row`].
    ///
    /// # Errors
    ///
    /// Returns an error if a tuple contains an unterminated quoted span.
    pub fn rows(&self) -> Result<Vec<Row>, LexerError> {
        self.tuples().into_iter().map(parse_row).collect()
    }

    /// The column list as comma-separated text.
    #[must_use]
    pub fn columns_text(&self) -> String {
        self.columns.join(", ")
    }
}

/// SQL parser errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// Unexpected token.
    #[error("Unexpected token {found:?} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: TokenKind,
        /// Position in input.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },
    /// Empty column list.
    #[error("Empty column list in INSERT at position {pos}")]
    EmptyColumnList {
        /// Position of the opening parenthesis.
        pos: usize,
    },
    /// Statement is not terminated by a semicolon.
    #[error("INSERT starting at position {start} is not terminated by ';' (found {found:?} at position {pos})")]
    MissingSemicolon {
        /// Position of the statement's `INSERT` keyword.
        start: usize,
        /// What was found instead.
        found: TokenKind,
        /// Position in input.
        pos: usize,
    },
}

/// Iterator over the INSERT statements of a cleaned script, in source order.
pub struct StatementExtractor<'a> {
    input: &'a str,
    cursor: usize,
    options: ExtractOptions,
}

impl<'a> StatementExtractor<'a> {
    /// Create a new extractor over the given input.
    #[must_use]
    pub fn new(input: &'a str, options: ExtractOptions) -> Self {
        Self {
            input,
            cursor: 0,
            options,
        }
    }

    /// Find the next `INSERT` keyword token at or after the cursor.
    ///
    /// Keywords inside string literals and quoted identifiers are not tokens
    /// of their own, so they are never candidates.
    fn next_candidate(&self) -> Option<usize> {
        let mut lexer = Lexer::starting_at(self.input, self.cursor);
        loop {
            match lexer.next() {
                Ok(Token {
                    kind: TokenKind::Word(word),
                    pos,
                    ..
                }) if self.options.matches_keyword(&word, "INSERT") => return Some(pos),
                Ok(Token {
                    kind: TokenKind::Eof,
                    ..
                }) => return None,
                Ok(_) => {}
                // An unmatched quote opens nothing; step over it.
                Err(
                    LexerError::UnterminatedString { pos }
                    | LexerError::UnterminatedQuotedIdentifier { pos, .. },
                ) => lexer = Lexer::starting_at(self.input, pos + 1),
            }
        }
    }
}

impl Iterator for StatementExtractor<'_> {
    type Item = Result<InsertStatement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.next_candidate()?;
            let mut parser = Parser::new(self.input, start, self.options);
            match parser.parse_insert() {
                Ok(statement) => {
                    self.cursor = parser.position();
                    return Some(Ok(statement));
                }
                Err(err) => {
                    self.cursor = start + "INSERT".len();
                    if self.options.strict {
                        return Some(Err(err));
                    }
                    tracing::debug!(position = start, error = %err, "skipping malformed INSERT");
                }
            }
        }
    }
}

/// Extract all INSERT statements from a cleaned script.
///
/// # Errors
///
/// In strict mode, returns the first malformed statement's error. In lenient
/// mode this never fails.
///
/// # Example
///
/// ```rust
/// use sql_to_liquibase::sql::{ExtractOptions, extract_statements};
///
/// let statements = extract_statements(
///     "INSERT INTO public.users (id, name) VALUES (1, 'Alice'), (2, NULL);",
///     ExtractOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].table_name, "users");
/// assert_eq!(statements[0].tuples(), ["1, 'Alice'", "2, NULL"]);
/// ```
pub fn extract_statements(
    input: &str,
    options: ExtractOptions,
) -> Result<Vec<InsertStatement>, ParseError> {
    StatementExtractor::new(input, options).collect()
}

/// Recursive-descent parser for a single INSERT statement.
struct Parser<'a> {
    lexer: Lexer<'a>,
    start: usize,
    options: ExtractOptions,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, start: usize, options: ExtractOptions) -> Self {
        Self {
            lexer: Lexer::starting_at(input, start),
            start,
            options,
        }
    }

    fn position(&self) -> usize {
        self.lexer.position()
    }

    /// Parse an INSERT statement, including its terminating semicolon.
    fn parse_insert(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_keyword("INSERT")?;
        self.expect_keyword("INTO")?;

        let (schema, table_name) = self.parse_table_name()?;

        let open = self.expect(&TokenKind::LParen)?;
        if self.lexer.peek()?.kind == TokenKind::RParen {
            return Err(ParseError::EmptyColumnList { pos: open.pos });
        }
        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier()?);
            if self.lexer.peek()?.kind != TokenKind::Comma {
                break;
            }
            self.lexer.next()?;
        }
        self.expect(&TokenKind::RParen)?;

        self.expect_keyword("VALUES")?;

        let mut spans = Vec::new();
        loop {
            spans.push(self.parse_tuple()?);
            if self.lexer.peek()?.kind != TokenKind::Comma {
                break;
            }
            self.lexer.next()?;
        }

        let token = self.lexer.next()?;
        if token.kind != TokenKind::Semicolon {
            return Err(ParseError::MissingSemicolon {
                start: self.start,
                found: token.kind,
                pos: token.pos,
            });
        }

        // Tuple spans are absolute; rebase them onto the values block.
        let block_start = spans.first().map_or(0, |span| span.start - 1);
        let block_end = spans.last().map_or(0, |span| span.end + 1);
        let input = self.lexer.input();
        Ok(InsertStatement {
            table_name,
            schema,
            columns,
            raw_values_block: input[block_start..block_end].to_string(),
            tuple_spans: spans
                .into_iter()
                .map(|span| span.start - block_start..span.end - block_start)
                .collect(),
        })
    }

    /// Parse a possibly schema-qualified table name into `(schema, table)`.
    fn parse_table_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let first = self.lexer.next()?;
        let mut parts = Vec::new();
        let mut end = first.end;
        push_name_parts(&mut parts, first)?;

        // Adjacent pieces such as `"public".users` belong to the same name.
        loop {
            let token = self.lexer.peek()?;
            let adjacent = token.pos == end
                && matches!(
                    token.kind,
                    TokenKind::Word(_) | TokenKind::QuotedIdentifier(_)
                );
            if !adjacent {
                break;
            }
            let token = self.lexer.next()?;
            end = token.end;
            push_name_parts(&mut parts, token)?;
        }

        let Some(table) = parts.pop() else {
            return Err(ParseError::UnexpectedEof {
                expected: "table name".into(),
            });
        };
        let schema = (!parts.is_empty()).then(|| parts.join("."));
        Ok((schema, table))
    }

    /// Consume a parenthesized tuple and return the span of its inner text.
    fn parse_tuple(&mut self) -> Result<Range<usize>, ParseError> {
        let open = self.expect(&TokenKind::LParen)?;
        let mut depth = 0usize;
        loop {
            let token = self.lexer.next()?;
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen if depth == 0 => return Ok(open.end..token.pos),
                TokenKind::RParen => depth -= 1,
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "')' closing the value tuple".into(),
                    });
                }
                TokenKind::Semicolon => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "')' closing the value tuple".into(),
                        found: token.kind,
                        pos: token.pos,
                    });
                }
                _ => {}
            }
        }
    }

    /// Expect a specific keyword.
    fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        let token = self.lexer.next()?;
        let matched =
            matches!(&token.kind, TokenKind::Word(word) if self.options.matches_keyword(word, keyword));
        if matched {
            Ok(token)
        } else if token.kind == TokenKind::Eof {
            Err(ParseError::UnexpectedEof {
                expected: keyword.into(),
            })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: keyword.into(),
                found: token.kind,
                pos: token.pos,
            })
        }
    }

    /// Expect a specific token kind.
    fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        let token = self.lexer.next()?;
        if core::mem::discriminant(&token.kind) == core::mem::discriminant(expected) {
            Ok(token)
        } else if token.kind == TokenKind::Eof {
            Err(ParseError::UnexpectedEof {
                expected: format!("{expected:?}"),
            })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("{expected:?}"),
                found: token.kind,
                pos: token.pos,
            })
        }
    }

    /// Expect an identifier and return its name.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::Word(name) | TokenKind::QuotedIdentifier(name) => Ok(name),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                expected: "identifier".into(),
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "identifier".into(),
                found: other,
                pos: token.pos,
            }),
        }
    }
}

/// Append the dotted components of a table-name token.
fn push_name_parts(parts: &mut Vec<String>, token: Token) -> Result<(), ParseError> {
    match token.kind {
        TokenKind::Word(word) => {
            parts.extend(
                word.split('.')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
            Ok(())
        }
        TokenKind::QuotedIdentifier(name) => {
            parts.push(name);
            Ok(())
        }
        TokenKind::Eof => Err(ParseError::UnexpectedEof {
            expected: "table name".into(),
        }),
        other => Err(ParseError::UnexpectedToken {
            expected: "table name".into(),
            found: other,
            pos: token.pos,
        }),
    }
}
