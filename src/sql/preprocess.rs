//! Text cleanup applied to a script before statements are extracted.

/// Strip `--` line comments and collapse all whitespace runs into one space.
///
/// Leading and trailing whitespace is trimmed. The cleanup is textual, so a
/// `--` or a newline inside a string literal is affected too.
///
/// # Example
///
/// ```rust
/// use sql_to_liquibase::sql::clean_sql;
///
/// let cleaned = clean_sql("-- seed data\nINSERT INTO t (a)\n    VALUES (1);  -- done\n");
/// assert_eq!(cleaned, "INSERT INTO t (a) VALUES (1);");
/// ```
#[must_use]
pub fn clean_sql(content: &str) -> String {
    let mut cleaned = String::with_capacity(content.len());
    for line in content.split('\n') {
        let code = line.find("--").map_or(line, |idx| &line[..idx]);
        for word in code.split_whitespace() {
            if !cleaned.is_empty() {
                cleaned.push(' ');
            }
            cleaned.push_str(word);
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_line_comments() {
        assert_eq!(clean_sql("a -- one\nb--two\n-- three"), "a b");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_sql("  a\t\tb\r\n\n  c  "), "a b c");
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert_eq!(clean_sql(""), "");
        assert_eq!(clean_sql("-- nothing here\n   \n--\n"), "");
    }

    #[test]
    fn test_newlines_inside_literals_are_collapsed() {
        assert_eq!(clean_sql("'line one\n   line two'"), "'line one line two'");
    }
}
