use clap::Args;
use schemaprobe::lens::enumerate::{ColumnRow, EnumerationScope};
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the Columns command
#[derive(Args)]
pub struct ColumnsArgs {
    /// Database to enumerate (`CD` or omitted for the current database)
    #[clap(short = 'D', long = "db", value_name = "DB")]
    pub db: Option<String>,

    /// Table(s) to enumerate, comma separated (default: all tables of the database)
    #[clap(short = 'T', long = "tbl", value_name = "TBL")]
    pub tbl: Option<String>,
}

pub fn run(config: &ProbeConfig, args: ColumnsArgs, output_format: OutputFormat) {
    let ColumnsArgs { db, tbl } = args;
    let scope = EnumerationScope {
        db,
        tbl,
        ..Default::default()
    };

    let session = open_session(config);
    let mut lens = session.lens();

    let columns = match lens.get_columns(&scope) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if columns.is_empty() && !output_format.is_json() {
        println!("No columns found");
        return;
    }

    print_rows(&ColumnRow::from_map(&columns), output_format);
}
