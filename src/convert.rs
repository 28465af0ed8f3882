//! End-to-end conversion of an INSERT script into a Liquibase changelog.
//!
//! A run reads the whole script, cleans it, extracts the statements, pairs
//! every value tuple with its column list and renders the records. Nothing
//! is written until every statement has been processed.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::changelog::{ChangeLog, ChangeLogConfig, Record, write_csv};
use crate::errors::Error;
use crate::sql::{ExtractOptions, NullPolicy, StatementExtractor, clean_sql};

/// Default input script name.
pub const DEFAULT_INPUT: &str = "inserts.sql";
/// Default XML changelog name.
pub const DEFAULT_OUTPUT: &str = "liquibase_inserts.xml";
/// Default CSV dump name.
pub const DEFAULT_CSV_OUTPUT: &str = "inserts.csv";

/// Options for a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Statement extraction options; `strict` also rejects column count mismatches.
    pub extract: ExtractOptions,
    /// How `NULL` fields are recognised.
    pub null_policy: NullPolicy,
    /// Changeset template values.
    pub changelog: ChangeLogConfig,
}

/// The in-memory result of converting a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Number of INSERT statements that were extracted.
    pub statements: usize,
    /// One record per value tuple, in source order.
    pub records: Vec<Record>,
    /// Id of the generated changeset.
    pub changeset_id: String,
    /// The rendered `databaseChangeLog` document.
    pub xml: String,
}

/// What a file conversion wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of INSERT statements that were extracted.
    pub statements: usize,
    /// Number of rows written to the changelog.
    pub rows: usize,
    /// Path of the XML changelog.
    pub xml_path: PathBuf,
    /// Path of the CSV dump, if one was written.
    pub csv_path: Option<PathBuf>,
}

/// Converts INSERT scripts with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the given options.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Clean `sql` and turn every value tuple into a [`Record`].
    ///
    /// Returns the number of statements found along with the records.
    ///
    /// # Errors
    ///
    /// In strict mode, fails on the first malformed statement or on a row
    /// whose value count differs from its column count.
    pub fn records(&self, sql: &str) -> Result<(usize, Vec<Record>), Error> {
        let cleaned = clean_sql(sql);
        let strict = self.options.extract.strict;

        let mut statements = 0;
        let mut records = Vec::new();
        for statement in StatementExtractor::new(&cleaned, self.options.extract) {
            let statement = statement?;
            statements += 1;

            let rows = statement.rows().map_err(|source| Error::Row {
                table: statement.table_name.clone(),
                source,
            })?;
            tracing::debug!(
                table = %statement.table_name,
                columns = %statement.columns_text(),
                rows = rows.len(),
                "extracted INSERT"
            );

            for row in rows {
                if row.len() != statement.columns.len() {
                    if strict {
                        return Err(Error::ColumnCountMismatch {
                            table: statement.table_name,
                            columns: statement.columns.len(),
                            values: row.len(),
                        });
                    }
                    tracing::warn!(
                        table = %statement.table_name,
                        columns = statement.columns.len(),
                        values = row.len(),
                        "column/value count mismatch, unmatched entries dropped"
                    );
                }
                records.push(Record::pair(
                    &statement.table_name,
                    &statement.columns,
                    row,
                    self.options.null_policy,
                ));
            }
        }

        Ok((statements, records))
    }

    /// Convert a script held in memory, stamping the changeset with `at`.
    ///
    /// # Errors
    ///
    /// See [`Converter::records`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use sql_to_liquibase::Converter;
    ///
    /// let at = NaiveDate::from_ymd_opt(2024, 1, 1)
    ///     .unwrap()
    ///     .and_hms_opt(12, 0, 0)
    ///     .unwrap();
    /// let conversion = Converter::default()
    ///     .convert_str("INSERT INTO users (id, name) VALUES (1, 'Alice'), (2, NULL);", at)
    ///     .unwrap();
    /// assert_eq!(conversion.records.len(), 2);
    /// assert_eq!(conversion.changeset_id, "your_id_20240101120000");
    /// assert!(conversion.xml.contains(r#"<column name="name"/>"#));
    /// ```
    pub fn convert_str(&self, sql: &str, at: NaiveDateTime) -> Result<Conversion, Error> {
        let (statements, records) = self.records(sql)?;
        let changeset_id = self.options.changelog.changeset_id(at);
        let xml = ChangeLog::new(&self.options.changelog, &changeset_id, &records).to_string();
        Ok(Conversion {
            statements,
            records,
            changeset_id,
            xml,
        })
    }

    /// Convert the script at `input`, writing the changelog to `output` and,
    /// when `csv` is given and at least one row was parsed, a CSV dump.
    ///
    /// The changeset is stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Fails if the input is missing or not UTF-8, if an output cannot be
    /// written, or as described in [`Converter::records`].
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        csv: Option<&Path>,
    ) -> Result<Summary, Error> {
        self.convert_file_at(input, output, csv, Local::now().naive_local())
    }

    /// Like [`Converter::convert_file`], with an explicit changeset timestamp.
    ///
    /// # Errors
    ///
    /// See [`Converter::convert_file`].
    pub fn convert_file_at(
        &self,
        input: &Path,
        output: &Path,
        csv: Option<&Path>,
        at: NaiveDateTime,
    ) -> Result<Summary, Error> {
        tracing::debug!(input = %input.display(), "reading SQL script");
        let sql = read_sql_file(input)?;
        let conversion = self.convert_str(&sql, at)?;

        fs::write(output, &conversion.xml).map_err(|source| Error::Io {
            path: output.to_path_buf(),
            source,
        })?;

        let csv_path = match csv {
            Some(path) if !conversion.records.is_empty() => {
                write_csv_file(path, &conversion.records)?;
                Some(path.to_path_buf())
            }
            Some(path) => {
                tracing::info!(csv = %path.display(), "no rows parsed, CSV file not written");
                None
            }
            None => None,
        };

        tracing::info!(
            statements = conversion.statements,
            rows = conversion.records.len(),
            output = %output.display(),
            "conversion finished"
        );

        Ok(Summary {
            statements: conversion.statements,
            rows: conversion.records.len(),
            xml_path: output.to_path_buf(),
            csv_path,
        })
    }
}

/// Read a whole SQL script into memory.
///
/// # Errors
///
/// * `InputNotFound` - If `path` does not exist.
/// * `Encoding` - If the file is not valid UTF-8.
/// * `Io` - For any other read failure.
pub fn read_sql_file(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    String::from_utf8(bytes).map_err(|source| Error::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv_file(path: &Path, records: &[Record]) -> Result<(), Error> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = BufWriter::new(File::create(path).map_err(io_error)?);
    write_csv(&mut file, records)?;
    file.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::Column;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn strict() -> Converter {
        Converter::new(ConvertOptions {
            extract: ExtractOptions {
                strict: true,
                ..ExtractOptions::default()
            },
            ..ConvertOptions::default()
        })
    }

    #[test]
    fn test_comments_and_newlines_are_cleaned_first() {
        let sql = "-- seed\nINSERT INTO users\n  (id, name) -- cols\nVALUES\n  (1, 'Alice');\n";
        let (statements, records) = Converter::default().records(sql).unwrap();
        assert_eq!(statements, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].columns[1].value.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_lenient_mismatch_truncates() {
        let (_, records) = Converter::default()
            .records("INSERT INTO t (a, b) VALUES (1), (1, 2, 3);")
            .unwrap();
        assert_eq!(records[0].columns.len(), 1);
        assert_eq!(records[1].columns.len(), 2);
    }

    #[test]
    fn test_strict_mismatch_fails() {
        let err = strict()
            .records("INSERT INTO t (a, b) VALUES (1);")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnCountMismatch {
                columns: 2,
                values: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_strict_malformed_statement_fails() {
        let err = strict()
            .records("INSERT INTO t (a) VALUES (1)")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedStatement(_)));
    }

    #[test]
    fn test_legacy_null_policy() {
        let converter = Converter::new(ConvertOptions {
            null_policy: NullPolicy::Legacy,
            ..ConvertOptions::default()
        });
        let (_, records) = converter
            .records("INSERT INTO t (a, b) VALUES ('NULL', 'null');")
            .unwrap();
        assert!(records[0].columns.iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn test_convert_str_uses_config() {
        let converter = Converter::new(ConvertOptions {
            changelog: ChangeLogConfig::default()
                .with_author("ops")
                .with_id_prefix("seed_"),
            ..ConvertOptions::default()
        });
        let conversion = converter
            .convert_str("INSERT INTO t (a) VALUES (1);", at())
            .unwrap();
        assert_eq!(conversion.changeset_id, "seed_20240101120000");
        assert!(
            conversion
                .xml
                .contains(r#"<changeSet author="ops" id="seed_20240101120000">"#)
        );
        assert_eq!(
            conversion.records[0].columns,
            vec![Column {
                name: "a".into(),
                value: Some("1".into()),
            }]
        );
    }

    #[test]
    fn test_missing_input() {
        let err = read_sql_file(Path::new("definitely/not/here.sql")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }
}
