//! SQL lexer for tokenizing `INSERT` scripts.
//!
//! The lexer only knows the handful of token shapes the extractor needs:
//! words (keywords, identifiers and bare literals alike), single-quoted
//! strings, quoted identifiers and punctuation. Anything else is passed
//! through as a [`TokenKind::Symbol`] so that arbitrary expressions inside a
//! value tuple can be carried verbatim.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte offset where this token starts.
    pub pos: usize,
    /// Byte offset just past the end of this token.
    pub end: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of word characters, dots and underscores.
    ///
    /// Keywords, unquoted identifiers (including `schema.table`), numbers and
    /// the `NULL` sentinel all lex as words.
    Word(String),
    /// Single-quoted string literal, quotes stripped and escapes decoded.
    StringLiteral(String),
    /// Backtick or double-quoted identifier, quotes stripped.
    QuotedIdentifier(String),
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma
    Comma,
    /// Semicolon
    Semicolon,
    /// Any other single character (operators, casts, ...).
    Symbol(char),
    /// End of input
    Eof,
}

/// SQL lexer that produces tokens from input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::starting_at(input, 0)
    }

    /// Create a lexer that begins scanning at byte offset `pos`.
    ///
    /// Token positions stay relative to the full `input`.
    #[must_use]
    pub fn starting_at(input: &'a str, pos: usize) -> Self {
        Self {
            input,
            pos: pos.min(input.len()),
            peeked: None,
        }
    }

    /// Get the current position in the input.
    ///
    /// A peeked but unconsumed token is not counted as consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.peeked.as_ref().map_or(self.pos, |token| token.pos)
    }

    /// The input this lexer scans.
    #[must_use]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Peek at the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the next token is an unterminated quoted span.
    pub fn peek(&mut self) -> Result<&Token, LexerError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume and return the next token.
    ///
    /// # Errors
    ///
    /// Returns an error if the next token is an unterminated quoted span.
    pub fn next(&mut self) -> Result<Token, LexerError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.next_token()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second_char(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and comments.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '-' && self.peek_second_char() == Some('-') {
                // Line comment
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if c == '/' && self.peek_second_char() == Some('*') {
                // Block comment
                self.pos += 2;
                match self.input[self.pos..].find("*/") {
                    Some(offset) => self.pos += offset + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();

        let start_pos = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: start_pos,
                end: start_pos,
            });
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '\'' => return self.read_string(start_pos),
            '`' | '"' => return self.read_quoted_identifier(start_pos, c),
            _ if is_word_char(c) => return Ok(self.read_word(start_pos)),
            other => TokenKind::Symbol(other),
        };
        self.bump();

        Ok(Token {
            kind,
            pos: start_pos,
            end: self.pos,
        })
    }

    /// Read a single-quoted literal.
    ///
    /// Escape state is tracked one character at a time: a backslash escapes
    /// exactly the next character, and a doubled quote stands for one quote.
    fn read_string(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        self.bump();

        let mut value = String::new();
        let mut escaped = false;
        while let Some(c) = self.bump() {
            if escaped {
                push_escaped(&mut value, c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' {
                if self.peek_char() == Some('\'') {
                    self.bump();
                    value.push('\'');
                } else {
                    return Ok(Token {
                        kind: TokenKind::StringLiteral(value),
                        pos: start_pos,
                        end: self.pos,
                    });
                }
            } else {
                value.push(c);
            }
        }

        Err(LexerError::UnterminatedString { pos: start_pos })
    }

    fn read_quoted_identifier(
        &mut self,
        start_pos: usize,
        quote: char,
    ) -> Result<Token, LexerError> {
        self.bump();

        let mut name = String::new();
        while let Some(c) = self.bump() {
            if c == quote {
                if self.peek_char() == Some(quote) {
                    self.bump();
                    name.push(quote);
                } else {
                    return Ok(Token {
                        kind: TokenKind::QuotedIdentifier(name),
                        pos: start_pos,
                        end: self.pos,
                    });
                }
            } else {
                name.push(c);
            }
        }

        Err(LexerError::UnterminatedQuotedIdentifier {
            quote,
            pos: start_pos,
        })
    }

    fn read_word(&mut self, start_pos: usize) -> Token {
        while self.peek_char().is_some_and(is_word_char) {
            self.bump();
        }

        Token {
            kind: TokenKind::Word(self.input[start_pos..self.pos].to_string()),
            pos: start_pos,
            end: self.pos,
        }
    }
}

/// Decode the character following a backslash inside a string literal.
///
/// `\0` is kept as written: a NUL cannot appear in an XML document.
fn push_escaped(value: &mut String, c: char) {
    match c {
        'n' => value.push('\n'),
        't' => value.push('\t'),
        'r' => value.push('\r'),
        '0' => value.push_str("\\0"),
        other => value.push(other),
    }
}

/// Check if a character belongs to a word: identifier, keyword or bare literal.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// Unterminated string literal.
    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString {
        /// Position where string started.
        pos: usize,
    },
    /// Unterminated quoted identifier.
    #[error("Unterminated {quote}-quoted identifier starting at position {pos}")]
    UnterminatedQuotedIdentifier {
        /// The opening quote character.
        quote: char,
        /// Position where the identifier started.
        pos: usize,
    },
}
