//! Flat CSV dump of the parsed rows.

use std::io;

use indexmap::IndexMap;

use super::record::Record;

/// Write `records` as CSV and return the number of data rows written.
///
/// The header is taken from the first record; every later record is laid
/// out against it. Header columns a record lacks are written empty, and
/// columns outside the header are dropped. `NULL` is written as an empty
/// field. Nothing at all is written for an empty slice.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_csv<W: io::Write>(writer: W, records: &[Record]) -> Result<usize, csv::Error> {
    let Some(first) = records.first() else {
        return Ok(0);
    };
    let header: Vec<&str> = as_map(first).into_keys().collect();

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&header)?;

    for record in records {
        let values = as_map(record);
        let dropped = values
            .keys()
            .filter(|name| !header.contains(*name))
            .count();
        if dropped > 0 {
            tracing::warn!(
                table = %record.table_name,
                dropped,
                "columns outside the CSV header were dropped"
            );
        }
        writer.write_record(
            header
                .iter()
                .map(|name| values.get(name).copied().unwrap_or_default()),
        )?;
    }

    writer.flush()?;
    Ok(records.len())
}

/// Column name to value mapping of a record, `NULL` mapped to "".
fn as_map(record: &Record) -> IndexMap<&str, &str> {
    record
        .columns
        .iter()
        .map(|column| {
            (
                column.name.as_str(),
                column.value.as_deref().unwrap_or_default(),
            )
        })
        .collect()
}
