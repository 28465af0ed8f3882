//! Command-line entry point: convert an INSERT script into a Liquibase changelog.
//!
//! With no arguments, reads `inserts.sql` and writes `liquibase_inserts.xml`
//! in the current directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sql_to_liquibase::changelog::{
    ChangeLogConfig, DEFAULT_AUTHOR, DEFAULT_ID_PREFIX, DEFAULT_XSD_VERSION,
};
use sql_to_liquibase::convert::{DEFAULT_CSV_OUTPUT, DEFAULT_INPUT, DEFAULT_OUTPUT};
use sql_to_liquibase::sql::{ExtractOptions, NullPolicy};
use sql_to_liquibase::{ConvertOptions, Converter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQL script containing INSERT statements.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Liquibase XML changelog to write.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Also dump the rows as CSV (defaults to inserts.csv when no path is given).
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_CSV_OUTPUT)]
    csv: Option<PathBuf>,

    /// Changeset author.
    #[arg(long, default_value = DEFAULT_AUTHOR)]
    author: String,

    /// Prefix of the changeset id; a 14-digit timestamp is appended.
    #[arg(long, default_value = DEFAULT_ID_PREFIX)]
    id_prefix: String,

    /// Version of the dbchangelog XSD referenced by the document.
    #[arg(long, default_value = DEFAULT_XSD_VERSION)]
    xsd_version: String,

    /// Fail on malformed statements and column/value count mismatches.
    #[arg(long)]
    strict: bool,

    /// Treat the quoted string 'NULL' as NULL too.
    #[arg(long)]
    legacy_null: bool,

    /// Match INSERT, INTO and VALUES in any case.
    #[arg(long)]
    ignore_keyword_case: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            extract: ExtractOptions {
                ignore_keyword_case: self.ignore_keyword_case,
                strict: self.strict,
            },
            null_policy: if self.legacy_null {
                NullPolicy::Legacy
            } else {
                NullPolicy::Sql
            },
            changelog: ChangeLogConfig::default()
                .with_author(self.author.as_str())
                .with_id_prefix(self.id_prefix.as_str())
                .with_xsd_version(self.xsd_version.as_str()),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let converter = Converter::new(args.options());
    match converter.convert_file(&args.input, &args.output, args.csv.as_deref()) {
        Ok(summary) => {
            println!(
                "Conversion completed! Check '{}'",
                summary.xml_path.display()
            );
            if let Some(csv) = summary.csv_path {
                println!("CSV written to '{}'", csv.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sql-to-liquibase"]).unwrap();
        assert_eq!(args.input, PathBuf::from("inserts.sql"));
        assert_eq!(args.output, PathBuf::from("liquibase_inserts.xml"));
        assert_eq!(args.csv, None);
        assert_eq!(args.options(), ConvertOptions::default());
    }

    #[test]
    fn test_csv_flag_without_value() {
        let args = Args::try_parse_from(["sql-to-liquibase", "--csv"]).unwrap();
        assert_eq!(args.csv, Some(PathBuf::from("inserts.csv")));

        let args = Args::try_parse_from(["sql-to-liquibase", "seed.sql", "--csv", "rows.csv"])
            .unwrap();
        assert_eq!(args.input, PathBuf::from("seed.sql"));
        assert_eq!(args.csv, Some(PathBuf::from("rows.csv")));
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = Args::try_parse_from([
            "sql-to-liquibase",
            "--strict",
            "--legacy-null",
            "--ignore-keyword-case",
            "--author",
            "dba",
        ])
        .unwrap();
        let options = args.options();
        assert!(options.extract.strict);
        assert!(options.extract.ignore_keyword_case);
        assert_eq!(options.null_policy, NullPolicy::Legacy);
        assert_eq!(options.changelog.author(), "dba");
    }
}
