//! Splitting a value tuple into its individual fields.

use super::lexer::{Lexer, LexerError, Token, TokenKind};

/// How the `NULL` sentinel is recognised in a value tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Only the bare, unquoted keyword `NULL` (any case) is null.
    ///
    /// The quoted string `'NULL'` is an ordinary four-letter text value.
    #[default]
    Sql,
    /// A quoted `'NULL'` (any case) is null as well.
    ///
    /// Matches scripts that were converted by checking the field text after
    /// its quotes were stripped.
    Legacy,
}

/// A single scalar inside a value tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The unquoted `NULL` keyword.
    Null,
    /// A single-quoted string, quotes stripped and escapes decoded.
    Text(String),
    /// Any other field text, trimmed and kept verbatim (`42`, `-1.5`, `now()`).
    Literal(String),
}

impl Field {
    /// Returns whether this field is null under the given policy.
    #[must_use]
    pub fn is_null(&self, policy: NullPolicy) -> bool {
        match (self, policy) {
            (Field::Null, _) => true,
            (Field::Text(text), NullPolicy::Legacy) => text.eq_ignore_ascii_case("NULL"),
            _ => false,
        }
    }

    /// Resolve the field to its output value, `None` meaning "no value".
    #[must_use]
    pub fn resolve(self, policy: NullPolicy) -> Option<String> {
        if self.is_null(policy) {
            return None;
        }
        match self {
            Field::Null => None,
            Field::Text(text) | Field::Literal(text) => Some(text),
        }
    }
}

/// The parsed fields of one value tuple, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    /// Returns the fields of the row.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the row and returns its fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

impl From<Vec<Field>> for Row {
    fn from(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

/// Parse the inner text of a value tuple (without its parentheses).
///
/// Fields are separated by commas outside single-quoted strings and outside
/// nested parentheses. An empty tuple yields an empty row.
///
/// # Errors
///
/// Returns an error if a quoted span is never closed.
///
/// # Example
///
/// ```rust
/// use sql_to_liquibase::sql::{Field, parse_row};
///
/// let row = parse_row("1, 'Smith, John', NULL").unwrap();
/// assert_eq!(
///     row.fields(),
///     &[
///         Field::Literal("1".into()),
///         Field::Text("Smith, John".into()),
///         Field::Null,
///     ]
/// );
/// ```
pub fn parse_row(inner: &str) -> Result<Row, LexerError> {
    let mut lexer = Lexer::new(inner);
    let mut fields = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut depth = 0usize;
    let mut separated = false;

    loop {
        let token = lexer.next()?;
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Comma if depth == 0 => {
                fields.push(field_from_tokens(inner, &current));
                current.clear();
                separated = true;
            }
            TokenKind::LParen => {
                depth += 1;
                current.push(token);
            }
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                current.push(token);
            }
            _ => current.push(token),
        }
    }

    if separated || !current.is_empty() {
        fields.push(field_from_tokens(inner, &current));
    }

    Ok(Row { fields })
}

fn field_from_tokens(source: &str, tokens: &[Token]) -> Field {
    match tokens {
        [] => Field::Literal(String::new()),
        [single] => match &single.kind {
            TokenKind::StringLiteral(text) => Field::Text(text.clone()),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("NULL") => Field::Null,
            _ => Field::Literal(source[single.pos..single.end].to_string()),
        },
        [first, .., last] => Field::Literal(source[first.pos..last.end].to_string()),
    }
}
