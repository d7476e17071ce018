//! Session catalog cache
//!
//! Memoizes everything discovered during one enumeration session. Each level
//! has one container type and typed accessors; a populated level is never
//! overwritten implicitly, only through [`CatalogCache::invalidate`] or
//! [`CatalogCache::clear`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Column name -> type name (`None` when the type could not be resolved)
pub type ColumnMap = BTreeMap<String, Option<String>>;

/// Table name -> columns
pub type TableColumns = BTreeMap<String, ColumnMap>;

/// What is known about one user's privileges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeEntry {
    /// Administrator flag; `None` when the probe could not tell
    pub is_admin: Option<bool>,
    /// Detailed privileges; never populated for targets without grant tables
    pub privileges: Option<Vec<String>>,
}

/// Cache levels that can be invalidated independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLevel {
    Users,
    Databases,
    CurrentDatabase,
    Tables,
    Columns,
    Privileges,
}

/// Catalog discovered during one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCache {
    users: Vec<String>,
    databases: Vec<String>,
    current_database: Option<String>,
    tables: BTreeMap<String, Vec<String>>,
    columns: BTreeMap<String, TableColumns>,
    user_privileges: BTreeMap<String, PrivilegeEntry>,
}

/// Point-in-time copy of the cache, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub taken_at: DateTime<Utc>,
    pub dialect: String,
    pub catalog: CatalogCache,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Store the user list if none is cached yet; returns whether it was stored
    pub fn set_users(&mut self, users: Vec<String>) -> bool {
        if !self.users.is_empty() || users.is_empty() {
            return false;
        }
        self.users = users;
        true
    }

    // =========================================================================
    // Databases
    // =========================================================================

    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    /// Store the database list if none is cached yet
    pub fn set_databases(&mut self, databases: Vec<String>) -> bool {
        if !self.databases.is_empty() || databases.is_empty() {
            return false;
        }
        self.databases = databases;
        true
    }

    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    pub fn set_current_database(&mut self, name: String) -> bool {
        if self.current_database.is_some() || name.is_empty() {
            return false;
        }
        self.current_database = Some(name);
        true
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Tables of one database, if any were discovered
    pub fn tables(&self, database: &str) -> Option<&[String]> {
        self.tables
            .get(database)
            .filter(|t| !t.is_empty())
            .map(|t| t.as_slice())
    }

    pub fn has_tables(&self, database: &str) -> bool {
        self.tables(database).is_some()
    }

    /// Whether the database was already looked at, with or without tables
    pub fn tables_checked(&self, database: &str) -> bool {
        self.tables.contains_key(database)
    }

    /// Remember that a database has no tables
    pub fn mark_tables_checked(&mut self, database: &str) {
        self.tables.entry(database.to_string()).or_default();
    }

    pub fn all_tables(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tables
    }

    /// Append discovered tables to a database's entry
    pub fn append_tables(&mut self, database: &str, tables: Vec<String>) {
        if tables.is_empty() {
            return;
        }
        self.tables
            .entry(database.to_string())
            .or_default()
            .extend(tables);
    }

    // =========================================================================
    // Columns
    // =========================================================================

    pub fn columns(&self, database: &str, table: &str) -> Option<&ColumnMap> {
        self.columns.get(database).and_then(|t| t.get(table))
    }

    pub fn has_columns(&self, database: &str, table: &str) -> bool {
        self.columns(database, table).is_some()
    }

    pub fn all_columns(&self) -> &BTreeMap<String, TableColumns> {
        &self.columns
    }

    /// Store the columns of a table unless they are already cached
    pub fn set_columns(&mut self, database: &str, table: &str, columns: ColumnMap) -> bool {
        let tables = self.columns.entry(database.to_string()).or_default();
        if tables.get(table).is_some_and(|c| !c.is_empty()) {
            return false;
        }
        tables.insert(table.to_string(), columns);
        true
    }

    // =========================================================================
    // Privileges
    // =========================================================================

    pub fn privileges(&self) -> &BTreeMap<String, PrivilegeEntry> {
        &self.user_privileges
    }

    /// Record the administrator flag for a user; detailed privileges stay unset
    pub fn set_admin_flag(&mut self, user: &str, is_admin: Option<bool>) {
        self.user_privileges
            .entry(user.to_string())
            .or_default()
            .is_admin = is_admin;
    }

    /// Users known to be administrators
    pub fn administrators(&self) -> BTreeSet<String> {
        self.user_privileges
            .iter()
            .filter(|(_, p)| p.is_admin == Some(true))
            .map(|(u, _)| u.clone())
            .collect()
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Drop one level; dependent levels are kept
    pub fn invalidate(&mut self, level: CacheLevel) {
        match level {
            CacheLevel::Users => self.users.clear(),
            CacheLevel::Databases => self.databases.clear(),
            CacheLevel::CurrentDatabase => self.current_database = None,
            CacheLevel::Tables => self.tables.clear(),
            CacheLevel::Columns => self.columns.clear(),
            CacheLevel::Privileges => self.user_privileges.clear(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.databases.is_empty()
            && self.current_database.is_none()
            && self.tables.is_empty()
            && self.columns.is_empty()
            && self.user_privileges.is_empty()
    }

    pub fn snapshot(&self, dialect: &str) -> CatalogSnapshot {
        CatalogSnapshot {
            taken_at: Utc::now(),
            dialect: dialect.to_string(),
            catalog: self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_users_are_not_overwritten() {
        let mut cache = CatalogCache::new();
        assert!(!cache.set_users(Vec::new()));
        assert!(cache.set_users(names(&["alice", "bob"])));
        assert!(!cache.set_users(names(&["mallory"])));
        assert_eq!(cache.users(), &["alice", "bob"]);
    }

    #[test]
    fn test_tables_accumulate_per_database() {
        let mut cache = CatalogCache::new();
        cache.append_tables("prod", names(&["orders"]));
        cache.append_tables("prod", names(&["customers"]));
        cache.append_tables("dev", names(&["scratch"]));
        cache.append_tables("empty", Vec::new());

        assert_eq!(cache.tables("prod").unwrap(), &["orders", "customers"]);
        assert_eq!(cache.tables("dev").unwrap(), &["scratch"]);
        assert!(!cache.has_tables("empty"));
        assert!(!cache.tables_checked("empty"));
        assert_eq!(cache.all_tables().len(), 2);

        cache.mark_tables_checked("empty");
        cache.mark_tables_checked("prod");
        assert!(cache.tables_checked("empty"));
        assert!(!cache.has_tables("empty"));
        assert_eq!(cache.tables("prod").unwrap(), &["orders", "customers"]);
    }

    #[test]
    fn test_columns_set_once() {
        let mut cache = CatalogCache::new();
        let first: ColumnMap = [("id".to_string(), Some("int".to_string()))].into();
        let second: ColumnMap = [("other".to_string(), None)].into();

        assert!(cache.set_columns("prod", "orders", first.clone()));
        assert!(!cache.set_columns("prod", "orders", second));
        assert_eq!(cache.columns("prod", "orders"), Some(&first));
        assert!(cache.has_columns("prod", "orders"));
        assert!(!cache.has_columns("prod", "customers"));
    }

    #[test]
    fn test_admin_flags() {
        let mut cache = CatalogCache::new();
        cache.set_admin_flag("sa", Some(true));
        cache.set_admin_flag("guest", Some(false));
        cache.set_admin_flag("probe", None);

        assert_eq!(cache.administrators().into_iter().collect::<Vec<_>>(), vec!["sa"]);
        assert_eq!(cache.privileges()["probe"].is_admin, None);
        assert!(cache.privileges().values().all(|p| p.privileges.is_none()));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = CatalogCache::new();
        cache.set_users(names(&["alice"]));
        cache.set_databases(names(&["prod"]));
        cache.append_tables("prod", names(&["orders"]));

        cache.invalidate(CacheLevel::Users);
        assert!(cache.users().is_empty());
        assert_eq!(cache.databases(), &["prod"]);
        assert!(cache.set_users(names(&["carol"])));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut cache = CatalogCache::new();
        cache.set_databases(names(&["prod"]));
        cache.set_current_database("prod".to_string());

        let snapshot = cache.snapshot("sybase");
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["dialect"], "sybase");
        assert_eq!(json["catalog"]["databases"][0], "prod");
        assert_eq!(json["catalog"]["current_database"], "prod");
    }
}
