use clap::Args;
use schemaprobe::lens::enumerate::NameRow;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the CurrentDb command
#[derive(Args)]
pub struct CurrentDbArgs {}

pub fn run(config: &ProbeConfig, _args: CurrentDbArgs, output_format: OutputFormat) {
    let session = open_session(config);
    let mut lens = session.lens();

    match lens.get_current_database() {
        Ok(Some(name)) => print_rows(&[NameRow { name }], output_format),
        Ok(None) => eprintln!("Unable to retrieve the current database name"),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
