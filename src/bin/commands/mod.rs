pub mod columns;
pub mod config;
pub mod current_db;
pub mod dbs;
pub mod dump;
pub mod privileges;
pub mod search;
pub mod tables;
pub mod users;

use anyhow::{anyhow, Result};
use schemaprobe::database::{DatabaseConn, SqliteExtractor};
use schemaprobe::dialect::Dialect;
use schemaprobe::extract::TechniqueSelector;
use schemaprobe::lens::enumerate::CatalogLens;
use schemaprobe::lens::utils::{format_rows, OutputFormat};
use schemaprobe::ProbeConfig;
use serde::Serialize;
use tabled::Tabled;

/// Everything one enumeration session borrows from
pub(crate) struct Session {
    pub dialect: Dialect,
    pub extractor: SqliteExtractor,
    pub selector: TechniqueSelector,
}

impl Session {
    pub fn open(config: &ProbeConfig) -> Result<Self> {
        let target = config.target.as_deref().ok_or_else(|| {
            anyhow!("No target configured; pass --target or set 'target' in the config file")
        })?;
        let dialect = config.load_target_dialect()?;
        let extractor = SqliteExtractor::new(DatabaseConn::open_path(target)?);

        Ok(Self {
            dialect,
            extractor,
            selector: config.selector(),
        })
    }

    pub fn lens(&self) -> CatalogLens<'_> {
        CatalogLens::new(&self.extractor, &self.dialect, self.selector.clone())
    }
}

/// Open a session or exit with an error message
pub(crate) fn open_session(config: &ProbeConfig) -> Session {
    match Session::open(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub(crate) fn print_rows<T: Tabled + Serialize>(rows: &[T], output_format: OutputFormat) {
    match format_rows(rows, output_format) {
        Ok(out) => println!("{}", out),
        Err(e) => eprintln!("ERROR: {}", e),
    }
}
