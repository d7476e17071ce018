//! Database module
//!
//! This module provides all storage-facing functionality for schemaprobe,
//! organized into:
//!
//! - **core**: SQLite target access (connection wrapper, bundled row extractor)
//! - **session**: Session-based storage (the catalog cache of one enumeration session)
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/                 # Target access
//! │   ├── connection        # SQLite DatabaseConn wrapper
//! │   └── sqlite_extractor  # Direct and inferential extraction over SQLite
//! │
//! └── session/              # Per-session storage
//!     └── catalog_cache     # Discovered users, databases, tables, columns, privileges
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use schemaprobe::database::{DatabaseConn, SqliteExtractor};
//!
//! let db = DatabaseConn::open_path("/srv/data/inventory.db")?;
//! let extractor = SqliteExtractor::new(db);
//! ```

pub mod core;
pub mod session;

pub use core::{DatabaseConn, SqliteExtractor};
pub use session::{
    CacheLevel, CatalogCache, CatalogSnapshot, ColumnMap, PrivilegeEntry, TableColumns,
};

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}
