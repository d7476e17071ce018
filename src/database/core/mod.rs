//! Core database infrastructure
//!
//! This module provides the foundational components for SQLite targets:
//! - `DatabaseConn`: SQLite connection wrapper with configuration
//! - `SqliteExtractor`: `RowExtractor` implementation over a `DatabaseConn`

mod connection;
mod sqlite_extractor;

pub use connection::DatabaseConn;
pub use sqlite_extractor::SqliteExtractor;
