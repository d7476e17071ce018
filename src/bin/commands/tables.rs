use clap::Args;
use schemaprobe::lens::enumerate::{EnumerationScope, TableRow};
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the Tables command
#[derive(Args)]
pub struct TablesArgs {
    /// Database(s) to enumerate, comma separated (`CD` for the current database)
    #[clap(short = 'D', long = "db", value_name = "DB")]
    pub db: Option<String>,
}

pub fn run(config: &ProbeConfig, args: TablesArgs, output_format: OutputFormat) {
    let TablesArgs { db } = args;
    let scope = EnumerationScope {
        db,
        ..Default::default()
    };

    let session = open_session(config);
    let mut lens = session.lens();

    let tables = match lens.get_tables(&scope) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if tables.is_empty() && !output_format.is_json() {
        println!("No tables found");
        return;
    }

    print_rows(&TableRow::from_map(&tables), output_format);
}
