use clap::{Parser, Subcommand};
use schemaprobe::config::parse_techniques;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;
use tracing::Level;

mod commands;

use commands::columns::ColumnsArgs;
use commands::config::ConfigArgs;
use commands::current_db::CurrentDbArgs;
use commands::dbs::DbsArgs;
use commands::dump::DumpArgs;
use commands::privileges::PrivilegesArgs;
use commands::search::{SearchArgs, SearchKind};
use commands::tables::TablesArgs;
use commands::users::UsersArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.schemaprobe/schemaprobe.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// SQLite target database (overrides the config file)
    #[clap(long, global = true)]
    target: Option<String>,

    /// Target dialect, default sqlite (overrides the config file)
    #[clap(long, global = true)]
    dialect: Option<String>,

    /// Confirmed technique, repeatable: union, error, boolean, time, stacked
    #[clap(long = "technique", global = true)]
    techniques: Vec<String>,

    /// Unrestricted direct access to the target
    #[clap(long, global = true)]
    direct: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate database users
    Users(UsersArgs),

    /// Enumerate database names
    Dbs(DbsArgs),

    /// Show the database the target session is connected to
    CurrentDb(CurrentDbArgs),

    /// Enumerate tables of one or more databases
    Tables(TablesArgs),

    /// Enumerate columns of tables in one database
    Columns(ColumnsArgs),

    /// Check which users are administrators
    Privileges(PrivilegesArgs),

    /// Search for databases by name
    SearchDb(SearchArgs),

    /// Search for tables by name
    SearchTable(SearchArgs),

    /// Search for columns by name
    SearchColumn(SearchArgs),

    /// Enumerate the whole catalog and write a JSON snapshot
    Dump(DumpArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let mut config = match ProbeConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Command-line flags win over the config file
    if let Some(target) = cli.target {
        config.target = Some(target);
    }
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect.trim().to_lowercase();
        config.dialect_file = None;
    }
    if !cli.techniques.is_empty() {
        match parse_techniques(&cli.techniques.join(",")) {
            Ok(t) => config.techniques = t,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    }
    if cli.direct {
        config.direct = true;
    }

    let output_format = cli.format;

    match cli.command {
        Commands::Users(args) => commands::users::run(&config, args, output_format),
        Commands::Dbs(args) => commands::dbs::run(&config, args, output_format),
        Commands::CurrentDb(args) => commands::current_db::run(&config, args, output_format),
        Commands::Tables(args) => commands::tables::run(&config, args, output_format),
        Commands::Columns(args) => commands::columns::run(&config, args, output_format),
        Commands::Privileges(args) => commands::privileges::run(&config, args, output_format),
        Commands::SearchDb(args) => {
            commands::search::run(&config, SearchKind::Database, args, output_format)
        }
        Commands::SearchTable(args) => {
            commands::search::run(&config, SearchKind::Table, args, output_format)
        }
        Commands::SearchColumn(args) => {
            commands::search::run(&config, SearchKind::Column, args, output_format)
        }
        Commands::Dump(args) => commands::dump::run(&config, args, output_format),
        Commands::Config(args) => commands::config::run(&config, args, output_format),
    }
}
