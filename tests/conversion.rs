//! Integration tests for the end-to-end conversion of INSERT scripts.
//!
//! These tests exercise the public `Converter` API both in memory and against
//! real files in a scratch directory.

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use sql_to_liquibase::{
    ConvertOptions, Converter, Error, ExtractOptions, NullPolicy, ParseError,
};
use uuid::Uuid;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Create a fresh, uniquely named directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sql-to-liquibase-{}", Uuid::now_v7()));
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

// =============================================================================
// In-memory conversion
// =============================================================================

#[test]
fn test_users_example() {
    let conversion = Converter::default()
        .convert_str(
            "INSERT INTO users (id, name) VALUES (1, 'Alice'), (2, NULL);",
            at(),
        )
        .expect("Failed to convert");

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<databaseChangeLog xmlns="http://www.liquibase.org/xml/ns/dbchangelog"
                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                   xsi:schemaLocation="http://www.liquibase.org/xml/ns/dbchangelog
                       http://www.liquibase.org/xml/ns/dbchangelog/dbchangelog-4.26.xsd">
    <changeSet author="your_author" id="your_id_20240101120000">
        <insert tableName="users">
            <column name="id" value="1"/>
            <column name="name" value="Alice"/>
        </insert>
        <insert tableName="users">
            <column name="id" value="2"/>
            <column name="name"/>
        </insert>
    </changeSet>
</databaseChangeLog>
"#;
    assert_eq!(conversion.xml, expected);
    assert_eq!(conversion.statements, 1);
    assert_eq!(conversion.records.len(), 2);
}

#[test]
fn test_comma_inside_quoted_field() {
    let conversion = Converter::default()
        .convert_str(
            "INSERT INTO people (id, full_name) VALUES (7, 'Smith, John');",
            at(),
        )
        .unwrap();
    assert!(
        conversion
            .xml
            .contains(r#"<column name="full_name" value="Smith, John"/>"#)
    );
}

#[test]
fn test_null_sentinel_any_case() {
    let conversion = Converter::default()
        .convert_str("INSERT INTO t (a, b, c) VALUES (NULL, null, Null);", at())
        .unwrap();
    for name in ["a", "b", "c"] {
        assert!(
            conversion
                .xml
                .contains(&format!(r#"<column name="{name}"/>"#))
        );
    }
}

#[test]
fn test_quoted_null_depends_on_policy() {
    let sql = "INSERT INTO t (a) VALUES ('NULL');";

    let sql_policy = Converter::default().convert_str(sql, at()).unwrap();
    assert!(sql_policy.xml.contains(r#"<column name="a" value="NULL"/>"#));

    let legacy = Converter::new(ConvertOptions {
        null_policy: NullPolicy::Legacy,
        ..ConvertOptions::default()
    })
    .convert_str(sql, at())
    .unwrap();
    assert!(legacy.xml.contains(r#"<column name="a"/>"#));
}

#[test]
fn test_malformed_statement_is_skipped() {
    let sql = "
        INSERT INTO a (x) VALUES (1);
        INSERT INTO broken (y) VALUES (2)
        INSERT INTO c (z) VALUES (3);
    ";
    let conversion = Converter::default().convert_str(sql, at()).unwrap();
    let tables: Vec<_> = conversion
        .records
        .iter()
        .map(|r| r.table_name.as_str())
        .collect();
    assert_eq!(tables, ["a", "c"]);
    assert!(!conversion.xml.contains("broken"));
}

#[test]
fn test_malformed_statement_in_strict_mode() {
    let converter = Converter::new(ConvertOptions {
        extract: ExtractOptions {
            strict: true,
            ..ExtractOptions::default()
        },
        ..ConvertOptions::default()
    });
    let err = converter
        .convert_str("INSERT INTO broken (y) VALUES (2)", at())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedStatement(ParseError::MissingSemicolon { .. })
    ));
}

#[test]
fn test_schema_prefix_is_dropped() {
    let conversion = Converter::default()
        .convert_str("INSERT INTO public.users (id) VALUES (1);", at())
        .unwrap();
    assert!(conversion.xml.contains(r#"<insert tableName="users">"#));
    assert!(!conversion.xml.contains("public"));
}

#[test]
fn test_mixed_script() {
    let sql = "
        -- Seed data for the demo schema
        CREATE TABLE roles (id INT, label TEXT);
        INSERT INTO roles (id, label) VALUES
            (1, 'admin'),   -- full access
            (2, 'viewer');
        UPDATE roles SET label = 'reader' WHERE id = 2;
        insert into ignored (id) values (9);
        INSERT INTO audit (id, note, created_at) VALUES (1, 'O\\'Reilly; \"quoted\"', now());
    ";
    let conversion = Converter::default().convert_str(sql, at()).unwrap();
    assert_eq!(conversion.statements, 2);
    assert_eq!(conversion.records.len(), 3);

    let audit = &conversion.records[2];
    assert_eq!(audit.table_name, "audit");
    assert_eq!(
        audit.columns[1].value.as_deref(),
        Some("O'Reilly; \"quoted\"")
    );
    assert_eq!(audit.columns[2].value.as_deref(), Some("now()"));
}

// =============================================================================
// File conversion
// =============================================================================

#[test]
fn test_convert_file_with_csv() {
    let dir = scratch_dir();
    let input = dir.join("inserts.sql");
    let output = dir.join("liquibase_inserts.xml");
    let csv = dir.join("inserts.csv");
    fs::write(
        &input,
        "INSERT INTO users (id, name) VALUES (1, 'Smith, John'), (2, NULL);\n",
    )
    .unwrap();

    let summary = Converter::default()
        .convert_file_at(&input, &output, Some(&csv), at())
        .expect("Failed to convert file");

    assert_eq!(summary.statements, 1);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.xml_path, output);
    assert_eq!(summary.csv_path.as_deref(), Some(csv.as_path()));

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains(r#"id="your_id_20240101120000""#));
    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "id,name\n1,\"Smith, John\"\n2,\n"
    );

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_empty_input_writes_empty_changeset_and_no_csv() {
    let dir = scratch_dir();
    let input = dir.join("inserts.sql");
    let output = dir.join("out.xml");
    let csv = dir.join("out.csv");
    fs::write(&input, "-- only a comment\n\n").unwrap();

    let summary = Converter::default()
        .convert_file_at(&input, &output, Some(&csv), at())
        .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.csv_path, None);
    assert!(!csv.exists());
    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<changeSet"));
    assert!(!xml.contains("<insert"));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_missing_input_file() {
    let dir = scratch_dir();
    let output = dir.join("out.xml");
    let err = Converter::default()
        .convert_file(&dir.join("missing.sql"), &output, None)
        .unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
    assert!(!output.exists());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_non_utf8_input_file() {
    let dir = scratch_dir();
    let input = dir.join("latin1.sql");
    fs::write(&input, b"INSERT INTO t (a) VALUES ('caf\xe9');").unwrap();
    let err = Converter::default()
        .convert_file(&input, &dir.join("out.xml"), None)
        .unwrap_err();
    assert!(matches!(err, Error::Encoding { .. }));

    fs::remove_dir_all(dir).unwrap();
}
