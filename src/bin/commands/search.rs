use clap::Args;
use schemaprobe::lens::enumerate::{EnumerationScope, NameRow};
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// What a search command looks for
#[derive(Clone, Copy)]
pub enum SearchKind {
    Database,
    Table,
    Column,
}

/// Arguments for the search commands
#[derive(Args)]
pub struct SearchArgs {
    #[clap(flatten)]
    pub scope: EnumerationScope,
}

pub fn run(config: &ProbeConfig, kind: SearchKind, args: SearchArgs, output_format: OutputFormat) {
    let session = open_session(config);
    let lens = session.lens();

    let found = match kind {
        SearchKind::Database => lens.search_database(&args.scope),
        SearchKind::Table => lens.search_table(&args.scope),
        SearchKind::Column => lens.search_column(&args.scope),
    };

    if found.is_empty() && !output_format.is_json() {
        eprintln!(
            "Searching is not supported for the {} dialect",
            session.dialect.name
        );
        return;
    }

    print_rows(&NameRow::from_names(&found), output_format);
}
