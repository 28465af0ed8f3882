//! Serialization of parsed rows into Liquibase changelogs and CSV dumps.

mod config;
mod csv_writer;
mod record;
mod xml;

pub use config::{
    ChangeLogConfig, DEFAULT_AUTHOR, DEFAULT_ID_PREFIX, DEFAULT_XSD_VERSION, TIMESTAMP_FORMAT,
};
pub use csv_writer::write_csv;
pub use record::{Column, Record};
pub use xml::{ChangeLog, escape_xml};
