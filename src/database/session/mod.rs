//! Session-based storage
//!
//! This module holds state that lives for exactly one enumeration session:
//! the catalog discovered so far.
//!
//! Unlike the target connection, session state is:
//! - Created per session and owned by the enumeration lens
//! - Never shared between sessions
//! - Discarded when the session ends (or carried over explicitly)

mod catalog_cache;

pub use catalog_cache::{
    CacheLevel, CatalogCache, CatalogSnapshot, ColumnMap, PrivilegeEntry, TableColumns,
};
