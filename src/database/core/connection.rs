//! Target connection management
//!
//! This module provides the SQLite connection wrapper used by the bundled
//! direct extractor.

use anyhow::{anyhow, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Core database connection wrapper
///
/// `DatabaseConn` wraps a SQLite connection to an enumeration target. File
/// targets are opened read-only so enumeration never changes them; in-memory
/// targets are writable so fixtures can be loaded.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a target at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => {
                if !Path::new(p).exists() {
                    return Err(anyhow!("Target database '{}' does not exist", p));
                }
                Connection::open_with_flags(
                    p,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
                )
                .map_err(|e| anyhow!("Failed to open target database at '{}': {}", p, e))?
            }
            None => Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    /// Open a target at the specified path (convenience method)
    pub fn open_path(path: &str) -> Result<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    fn configure(&self) -> Result<()> {
        // Keep temp tables for derived queries in memory
        self.conn
            .execute("PRAGMA temp_store=MEMORY", [])
            .map_err(|e| anyhow!("Failed to set temp store: {}", e))?;

        // Bounded wait when the target is being written by another process
        self.conn
            .busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| anyhow!("Failed to set busy timeout: {}", e))?;

        Ok(())
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.conn
            .execute(sql, [])
            .map_err(|e| anyhow!("Failed to execute SQL: {}", e))
    }

    /// Execute a batch of statements, used to load fixtures
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| anyhow!("Failed to execute SQL batch: {}", e))
    }

    /// Check if a table exists in the main schema
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table_name],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseConn::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_missing_target() {
        assert!(DatabaseConn::open_path("/nonexistent/target.db").is_err());
    }

    #[test]
    fn test_file_target_is_read_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("target.db");
        let path_str = path.to_str().unwrap();
        {
            let conn = Connection::open(path_str).unwrap();
            conn.execute_batch("CREATE TABLE orders (id INTEGER PRIMARY KEY)")
                .unwrap();
        }

        let db = DatabaseConn::open_path(path_str).unwrap();
        assert!(db.table_exists("orders").unwrap());
        assert!(db.execute("INSERT INTO orders (id) VALUES (1)").is_err());
    }
}
