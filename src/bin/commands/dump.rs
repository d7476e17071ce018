use clap::Args;
use schemaprobe::database::ensure_data_dir;
use schemaprobe::lens::enumerate::EnumerationScope;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::{EnumerationError, ProbeConfig};
use tracing::warn;

use super::open_session;

/// Arguments for the Dump command
#[derive(Args)]
pub struct DumpArgs {
    /// Snapshot file path (default: catalog-<dialect>.json in the data directory)
    #[clap(short, long)]
    pub output: Option<String>,

    /// Skip the columns level
    #[clap(long)]
    pub no_columns: bool,
}

pub fn run(config: &ProbeConfig, args: DumpArgs, output_format: OutputFormat) {
    let DumpArgs { output, no_columns } = args;

    let session = open_session(config);
    let mut lens = session.lens();

    if let Err(e) = lens.get_current_database() {
        warn!("{}", e);
    }
    if let Err(e) = lens.get_users() {
        warn!("{}", e);
    }

    let tables = match lens.get_tables(&EnumerationScope::new()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if !no_columns {
        for db in tables.keys() {
            match lens.get_database_columns(db, None) {
                Ok(_) | Err(EnumerationError::NoDataAvailable(_)) => {}
                Err(e) => warn!("columns of database '{}': {}", db, e),
            }
        }
    }

    let snapshot = lens.snapshot();
    let json = match output_format {
        OutputFormat::JsonPretty | OutputFormat::Table | OutputFormat::Markdown => {
            serde_json::to_string_pretty(&snapshot)
        }
        _ => serde_json::to_string(&snapshot),
    };
    let json = match json {
        Ok(j) => j,
        Err(e) => {
            eprintln!("ERROR: Failed to serialize catalog: {}", e);
            std::process::exit(1);
        }
    };

    if output_format.is_json() {
        println!("{}", json);
        return;
    }

    let path = match output {
        Some(p) => p,
        None => {
            if let Err(e) = ensure_data_dir(&config.data_dir) {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
            config.snapshot_path()
        }
    };
    if let Err(e) = std::fs::write(&path, json) {
        eprintln!("ERROR: Unable to write catalog snapshot to {}: {}", path, e);
        std::process::exit(1);
    }

    let cache = lens.cache();
    let column_count: usize = cache
        .all_columns()
        .values()
        .flat_map(|tables| tables.values())
        .map(|cols| cols.len())
        .sum();
    println!(
        "Catalog written to {}: {} database(s), {} table(s), {} column(s), {} user(s)",
        path,
        cache.all_tables().values().filter(|t| !t.is_empty()).count(),
        cache.all_tables().values().map(Vec::len).sum::<usize>(),
        column_count,
        cache.users().len()
    );
}
