//! Submodule pairing declared columns with parsed values.

use crate::sql::{NullPolicy, Row};

/// A named column value; `None` means SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column value, or `None` for no value.
    pub value: Option<String>,
}

/// One inserted row, ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Target table, without schema prefix.
    pub table_name: String,
    /// Column values in declaration order.
    pub columns: Vec<Column>,
}

impl Record {
    /// Pair the nth column name with the nth field of `row`.
    ///
    /// When the counts differ the unmatched tail of the longer side is dropped.
    #[must_use]
    pub fn pair(table_name: &str, columns: &[String], row: Row, policy: NullPolicy) -> Self {
        Self {
            table_name: table_name.to_string(),
            columns: columns
                .iter()
                .zip(row.into_fields())
                .map(|(name, field)| Column {
                    name: name.clone(),
                    value: field.resolve(policy),
                })
                .collect(),
        }
    }
}
