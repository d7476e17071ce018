use clap::Args;
use schemaprobe::lens::enumerate::NameRow;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the Users command
#[derive(Args)]
pub struct UsersArgs {}

pub fn run(config: &ProbeConfig, _args: UsersArgs, output_format: OutputFormat) {
    let session = open_session(config);
    let mut lens = session.lens();

    let users = match lens.get_users() {
        Ok(users) => users,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if users.is_empty() && !output_format.is_json() {
        println!("No database users found");
        return;
    }

    print_rows(&NameRow::from_names(&users), output_format);
}
