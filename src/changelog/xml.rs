//! Liquibase XML output.
//!
//! # Example
//!
//! ```rust
//! use sql_to_liquibase::changelog::{ChangeLog, ChangeLogConfig, Column, Record};
//!
//! let records = vec![Record {
//!     table_name: "users".into(),
//!     columns: vec![
//!         Column { name: "id".into(), value: Some("1".into()) },
//!         Column { name: "name".into(), value: None },
//!     ],
//! }];
//! let config = ChangeLogConfig::default();
//! let xml = ChangeLog::new(&config, "your_id_20240101000000", &records).to_string();
//! assert!(xml.contains(r#"<column name="id" value="1"/>"#));
//! assert!(xml.contains(r#"<column name="name"/>"#));
//! ```

use core::fmt::{self, Display};

use super::config::ChangeLogConfig;
use super::record::Record;

/// Substitutions applied in order; `&` must come first.
///
/// Line breaks and tabs are written as character references, since a parser
/// normalizes them to spaces inside attribute values.
const XML_ESCAPES: [(char, &str); 8] = [
    ('&', "&amp;"),
    ('\n', "&#10;"),
    ('\r', "&#13;"),
    ('\t', "&#9;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&apos;"),
];

const CHANGESET_INDENT: &str = "    ";
const INSERT_INDENT: &str = "        ";
const COLUMN_INDENT: &str = "            ";

/// Escape `& < > " '`, line breaks and tabs for use inside an XML attribute value.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut escaped = text.to_string();
    for (from, to) in XML_ESCAPES {
        if escaped.contains(from) {
            escaped = escaped.replace(from, to);
        }
    }
    escaped
}

/// A `databaseChangeLog` document with a single changeset of inserts.
///
/// Rendered through its [`Display`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct ChangeLog<'a> {
    config: &'a ChangeLogConfig,
    changeset_id: &'a str,
    records: &'a [Record],
}

impl<'a> ChangeLog<'a> {
    /// Create a changelog holding one `<insert>` per record.
    #[must_use]
    pub fn new(config: &'a ChangeLogConfig, changeset_id: &'a str, records: &'a [Record]) -> Self {
        Self {
            config,
            changeset_id,
            records,
        }
    }

    fn fmt_record(f: &mut fmt::Formatter<'_>, record: &Record) -> fmt::Result {
        writeln!(
            f,
            r#"{INSERT_INDENT}<insert tableName="{}">"#,
            escape_xml(&record.table_name)
        )?;
        for column in &record.columns {
            let name = escape_xml(&column.name);
            match &column.value {
                Some(value) => writeln!(
                    f,
                    r#"{COLUMN_INDENT}<column name="{name}" value="{}"/>"#,
                    escape_xml(value)
                )?,
                None => writeln!(f, r#"{COLUMN_INDENT}<column name="{name}"/>"#)?,
            }
        }
        writeln!(f, "{INSERT_INDENT}</insert>")
    }
}

impl Display for ChangeLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            f,
            r#"<databaseChangeLog xmlns="http://www.liquibase.org/xml/ns/dbchangelog""#
        )?;
        writeln!(
            f,
            r#"                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#
        )?;
        writeln!(
            f,
            r#"                   xsi:schemaLocation="http://www.liquibase.org/xml/ns/dbchangelog"#
        )?;
        writeln!(
            f,
            r#"                       http://www.liquibase.org/xml/ns/dbchangelog/dbchangelog-{}.xsd">"#,
            escape_xml(self.config.xsd_version())
        )?;
        writeln!(
            f,
            r#"{CHANGESET_INDENT}<changeSet author="{}" id="{}">"#,
            escape_xml(self.config.author()),
            escape_xml(self.changeset_id)
        )?;
        if self.records.is_empty() {
            writeln!(f)?;
        }
        for record in self.records {
            Self::fmt_record(f, record)?;
        }
        writeln!(f, "{CHANGESET_INDENT}</changeSet>")?;
        writeln!(f, "</databaseChangeLog>")
    }
}
