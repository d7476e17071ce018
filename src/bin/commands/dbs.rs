use clap::Args;
use schemaprobe::lens::enumerate::NameRow;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the Dbs command
#[derive(Args)]
pub struct DbsArgs {}

pub fn run(config: &ProbeConfig, _args: DbsArgs, output_format: OutputFormat) {
    let session = open_session(config);
    let mut lens = session.lens();

    match lens.get_databases() {
        Ok(dbs) if dbs.is_empty() && !output_format.is_json() => {
            println!("No databases found");
        }
        Ok(dbs) => print_rows(&NameRow::from_names(&dbs), output_format),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
