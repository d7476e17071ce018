//! Enumeration lens
//!
//! This module provides the catalog enumeration lens. It drives the
//! technique selector and the pivot executor level by level, resolves each
//! level's prerequisites, and memoizes everything it learns in a
//! session-scoped [`CatalogCache`].
//!
//! # Levels
//!
//! | Operation | Prerequisite | Cache entry |
//! |-----------|--------------|-------------|
//! | `get_users` | - | `users` |
//! | `get_databases` | - | `databases` |
//! | `get_current_database` | - | `current_database` |
//! | `get_tables` | database scope (caller or `get_databases`) | `tables[db]` |
//! | `get_columns` | one database, table list (caller or `get_tables`) | `columns[db][tbl]` |
//! | `get_privileges` | user scope (caller or `get_users`) | `user_privileges[user]` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use schemaprobe::dialect::Dialect;
//! use schemaprobe::extract::{Technique, TechniqueSelector};
//! use schemaprobe::lens::enumerate::{CatalogLens, EnumerationScope};
//!
//! let dialect = Dialect::sybase();
//! let selector = TechniqueSelector::new([Technique::Union, Technique::Boolean]);
//! let mut lens = CatalogLens::new(&extractor, &dialect, selector);
//!
//! let tables = lens.get_tables(&EnumerationScope::new().with_db("prod"))?;
//! ```

pub mod args;
#[cfg(feature = "display")]
pub mod types;

pub use args::{is_current_db, EnumerationScope, CURRENT_DB_TOKEN};
#[cfg(feature = "display")]
pub use types::{ColumnRow, NameRow, PrivilegeRow, TableRow};

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::database::{
    CacheLevel, CatalogCache, CatalogSnapshot, ColumnMap, PrivilegeEntry, TableColumns,
};
use crate::dialect::{render, Dialect, Level, NAME_FIELD, TYPE_FIELD};
use crate::error::{EnumerationError, EnumerationResult, ExtractionError};
use crate::extract::{
    AdministratorProbe, ExtractionResult, PivotExecutor, RowExtractor, TechniqueSelector,
};

/// Outcome of walking the strategy list for one level and scope
enum Outcome {
    /// A strategy returned rows
    Found(ExtractionResult),
    /// No strategy returned rows
    Absent,
    /// Every strategy failed; carries the last failure
    Failed(ExtractionError),
}

/// Catalog enumeration lens
///
/// Owns the session cache. Every enumeration operation takes `&mut self`, so
/// one lens drives one sequential conversation with the target.
pub struct CatalogLens<'a> {
    extractor: &'a dyn RowExtractor,
    dialect: &'a Dialect,
    selector: TechniqueSelector,
    cache: CatalogCache,
}

impl<'a> CatalogLens<'a> {
    /// Create a lens with an empty cache
    pub fn new(
        extractor: &'a dyn RowExtractor,
        dialect: &'a Dialect,
        selector: TechniqueSelector,
    ) -> Self {
        Self {
            extractor,
            dialect,
            selector,
            cache: CatalogCache::new(),
        }
    }

    /// Continue a previous session with its cache
    pub fn with_cache(mut self, cache: CatalogCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// End the session, keeping what was discovered
    pub fn into_cache(self) -> CatalogCache {
        self.cache
    }

    pub fn dialect(&self) -> &Dialect {
        self.dialect
    }

    pub fn selector(&self) -> &TechniqueSelector {
        &self.selector
    }

    /// Forget one level so the next call enumerates it again
    pub fn invalidate(&mut self, level: CacheLevel) {
        self.cache.invalidate(level);
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.cache.snapshot(&self.dialect.name)
    }

    // =========================================================================
    // Strategy loop
    // =========================================================================

    fn run_level(&self, level: Level, source: &str, fields: &[&str]) -> Outcome {
        let pivot = PivotExecutor::new(self.extractor);
        let strategies = self.selector.select_strategies();
        let mut last_error = None;
        let mut failures = 0;

        for strategy in &strategies {
            match pivot.pivot(source, fields, *strategy) {
                Ok(Some(result)) => {
                    debug!("{} found with {} strategy", level, strategy);
                    return Outcome::Found(result);
                }
                Ok(None) => debug!("{} not found with {} strategy", level, strategy),
                Err(e) => {
                    warn!("{}", e);
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == strategies.len() => Outcome::Failed(e),
            _ => Outcome::Absent,
        }
    }

    fn template(&self, level: Level) -> Option<&'a str> {
        self.dialect.templates.get(level)
    }

    /// Render a template for a database scope
    fn database_source(&self, template: &str, db: &str, tbl: Option<&str>) -> String {
        let safe_db = self.dialect.safe_name(db);
        let db_literal = self.dialect.literal(db);
        let tbl_literal = tbl.map(|t| self.dialect.literal(t)).unwrap_or_default();
        render(
            template,
            &[
                ("db", safe_db.as_str()),
                ("db_literal", db_literal.as_str()),
                ("tbl", tbl_literal.as_str()),
            ],
        )
    }

    // =========================================================================
    // Users and databases
    // =========================================================================

    /// Enumerate database users
    pub fn get_users(&mut self) -> EnumerationResult<Vec<String>> {
        if !self.cache.users().is_empty() {
            return Ok(self.cache.users().to_vec());
        }
        info!("fetching {}", Level::Users);

        let source = self.template(Level::Users).unwrap_or_default();
        match self.run_level(Level::Users, source, &[NAME_FIELD]) {
            Outcome::Found(result) => {
                self.cache.set_users(result.texts(NAME_FIELD));
            }
            Outcome::Absent => warn!("unable to retrieve the {}", Level::Users),
            Outcome::Failed(source) => {
                return Err(EnumerationError::ExtractionFailed {
                    level: Level::Users.description(),
                    source,
                })
            }
        }

        Ok(self.cache.users().to_vec())
    }

    /// Enumerate database names
    pub fn get_databases(&mut self) -> EnumerationResult<Vec<String>> {
        if !self.cache.databases().is_empty() {
            return Ok(self.cache.databases().to_vec());
        }
        info!("fetching {}", Level::Databases);

        let source = self.template(Level::Databases).unwrap_or_default();
        match self.run_level(Level::Databases, source, &[NAME_FIELD]) {
            Outcome::Found(result) => {
                self.cache.set_databases(result.texts(NAME_FIELD));
            }
            Outcome::Absent => warn!("unable to retrieve the {}", Level::Databases),
            Outcome::Failed(source) => {
                return Err(EnumerationError::ExtractionFailed {
                    level: Level::Databases.description(),
                    source,
                })
            }
        }

        Ok(self.cache.databases().to_vec())
    }

    /// Name of the database the target session is connected to
    pub fn get_current_database(&mut self) -> EnumerationResult<Option<String>> {
        if let Some(name) = self.cache.current_database() {
            return Ok(Some(name.to_string()));
        }

        let Some(source) = self.template(Level::CurrentDatabase) else {
            warn!(
                "the {} dialect cannot tell the current database",
                self.dialect.name
            );
            return Ok(None);
        };
        info!("fetching {}", Level::CurrentDatabase);

        match self.run_level(Level::CurrentDatabase, source, &[NAME_FIELD]) {
            Outcome::Found(result) => {
                if let Some(name) = result.texts(NAME_FIELD).into_iter().next() {
                    self.cache.set_current_database(name);
                }
            }
            Outcome::Absent => warn!("unable to retrieve the {}", Level::CurrentDatabase),
            Outcome::Failed(source) => {
                return Err(EnumerationError::ExtractionFailed {
                    level: Level::CurrentDatabase.description(),
                    source,
                })
            }
        }

        Ok(self.cache.current_database().map(str::to_string))
    }

    /// Resolve a caller database entry, expanding the current-database sentinel
    fn resolve_database(&mut self, entry: &str) -> EnumerationResult<String> {
        if is_current_db(entry) {
            return self.get_current_database()?.ok_or_else(|| {
                EnumerationError::NoDataAvailable(
                    "unable to retrieve the current database name".to_string(),
                )
            });
        }
        Ok(self.dialect.unsafe_name(entry))
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Enumerate tables for the caller's databases, or for every database
    pub fn get_tables(
        &mut self,
        scope: &EnumerationScope,
    ) -> EnumerationResult<BTreeMap<String, Vec<String>>> {
        let databases = match scope.databases()? {
            Some(entries) => {
                let mut resolved = Vec::with_capacity(entries.len());
                for entry in entries {
                    resolved.push(self.resolve_database(&entry)?);
                }
                resolved
            }
            None => {
                let all = self.get_databases()?;
                if all.is_empty() {
                    return Err(EnumerationError::NoDataAvailable(
                        "unable to retrieve the database names".to_string(),
                    ));
                }
                all
            }
        };

        self.fetch_tables(&databases)
    }

    /// Enumerate tables of already resolved database names
    ///
    /// Databases that came back without tables are remembered once the call
    /// found tables somewhere, so repeating the scope issues no queries.
    fn fetch_tables(
        &mut self,
        databases: &[String],
    ) -> EnumerationResult<BTreeMap<String, Vec<String>>> {
        let template = self.template(Level::Tables).unwrap_or_default();
        let mut last_error = None;
        let mut absent = Vec::new();

        for db in databases {
            if self.cache.tables_checked(db) {
                continue;
            }
            info!("fetching tables for database '{}'", db);

            let source = self.database_source(template, db, None);
            match self.run_level(Level::Tables, &source, &[NAME_FIELD]) {
                Outcome::Found(result) => self.cache.append_tables(db, result.texts(NAME_FIELD)),
                Outcome::Absent => {
                    warn!("unable to retrieve the tables for database '{}'", db);
                    absent.push(db);
                }
                Outcome::Failed(e) => {
                    warn!("unable to retrieve the tables for database '{}'", db);
                    last_error = Some(e);
                }
            }
        }

        let found: BTreeMap<String, Vec<String>> = databases
            .iter()
            .filter_map(|db| self.cache.tables(db).map(|t| (db.clone(), t.to_vec())))
            .collect();

        if found.is_empty() {
            if let Some(source) = last_error {
                return Err(EnumerationError::ExtractionFailed {
                    level: Level::Tables.description(),
                    source,
                });
            }
            warn!("unable to retrieve the {}", Level::Tables);
            return Ok(found);
        }

        for db in absent {
            self.cache.mark_tables_checked(db);
        }
        Ok(found)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Enumerate columns of the caller's tables (or all tables) in one database
    ///
    /// Returns database -> table -> column -> type name for the tables in
    /// scope; the outer map has the resolved database as its only key.
    pub fn get_columns(
        &mut self,
        scope: &EnumerationScope,
    ) -> EnumerationResult<BTreeMap<String, TableColumns>> {
        let requested_db = scope.single_database()?;
        let requested_tables = scope.tables()?;

        let db = match requested_db {
            Some(entry) => self.resolve_database(&entry)?,
            None => {
                warn!("missing database parameter, using the current database");
                self.resolve_database(CURRENT_DB_TOKEN)?
            }
        };

        let tables: Option<Vec<String>> = requested_tables.map(|entries| {
            entries
                .iter()
                .map(|t| self.dialect.unsafe_name(t))
                .collect()
        });

        self.get_database_columns(&db, tables)
    }

    /// Enumerate columns in a database given by its raw name
    ///
    /// `tables` of `None` means every table of the database.
    pub fn get_database_columns(
        &mut self,
        db: &str,
        tables: Option<Vec<String>>,
    ) -> EnumerationResult<BTreeMap<String, TableColumns>> {
        let tables = match tables {
            Some(tables) => tables,
            None => self
                .fetch_tables(&[db.to_string()])?
                .remove(db)
                .unwrap_or_default(),
        };

        if tables.is_empty() {
            return Err(EnumerationError::NoDataAvailable(format!(
                "unable to retrieve the tables in database '{}'",
                db
            )));
        }

        let template = self.template(Level::Columns).unwrap_or_default();
        let mut last_error = None;

        for tbl in &tables {
            if self.cache.has_columns(db, tbl) {
                continue;
            }
            info!("fetching columns for table '{}' in database '{}'", tbl, db);

            let source = self.database_source(template, db, Some(tbl));
            match self.run_level(Level::Columns, &source, &[NAME_FIELD, TYPE_FIELD]) {
                Outcome::Found(result) => {
                    let columns = self.shape_columns(&result);
                    self.cache.set_columns(db, tbl, columns);
                }
                Outcome::Absent => warn!(
                    "unable to retrieve the columns for table '{}' in database '{}'",
                    tbl, db
                ),
                Outcome::Failed(e) => {
                    warn!(
                        "unable to retrieve the columns for table '{}' in database '{}'",
                        tbl, db
                    );
                    last_error = Some(e);
                }
            }
        }

        let found: TableColumns = tables
            .iter()
            .filter_map(|tbl| {
                self.cache
                    .columns(db, tbl)
                    .map(|cols| (tbl.clone(), cols.clone()))
            })
            .collect();

        if found.is_empty() {
            if let Some(source) = last_error {
                return Err(EnumerationError::ExtractionFailed {
                    level: Level::Columns.description(),
                    source,
                });
            }
            warn!("unable to retrieve the {}", Level::Columns);
            return Ok(BTreeMap::new());
        }

        Ok(BTreeMap::from([(db.to_string(), found)]))
    }

    /// Pair column names with resolved type names
    fn shape_columns(&self, result: &ExtractionResult) -> ColumnMap {
        let names = result.column(NAME_FIELD).unwrap_or(&[]);
        let types = result.column(TYPE_FIELD).unwrap_or(&[]);

        names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let name = name.as_text()?;
                let type_name = types
                    .get(i)
                    .and_then(|code| self.dialect.type_codes.resolve(code));
                Some((name, type_name))
            })
            .collect()
    }

    // =========================================================================
    // Privileges
    // =========================================================================

    /// Determine which users are administrators
    ///
    /// Detailed privileges are never enumerated; only the administrator flag
    /// is recorded. Returns the privilege map and the administrators among
    /// the users checked by this call.
    pub fn get_privileges(
        &mut self,
        probe: &dyn AdministratorProbe,
        scope: &EnumerationScope,
    ) -> EnumerationResult<(BTreeMap<String, PrivilegeEntry>, BTreeSet<String>)> {
        warn!(
            "detailed privileges cannot be fetched from {} targets, checking administrator status only",
            self.dialect.name
        );

        let users: Vec<String> = match scope.user() {
            Some(user) => vec![user.to_string()],
            None => self.get_users()?,
        };

        let users: Vec<String> = users
            .into_iter()
            .filter(|u| !u.trim().is_empty())
            .collect();
        for user in &users {
            let is_admin = probe.is_administrator(user);
            debug!("administrator status of '{}': {:?}", user, is_admin);
            self.cache.set_admin_flag(user, is_admin);
        }

        let admins = self
            .cache
            .administrators()
            .into_iter()
            .filter(|u| users.contains(u))
            .collect();

        Ok((self.cache.privileges().clone(), admins))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search for databases by name; not supported for catalog-only targets
    pub fn search_database(&self, _scope: &EnumerationScope) -> Vec<String> {
        warn!("on {} it is not possible to search databases", self.dialect.name);
        Vec::new()
    }

    pub fn search_table(&self, _scope: &EnumerationScope) -> Vec<String> {
        warn!("on {} it is not possible to search tables", self.dialect.name);
        Vec::new()
    }

    pub fn search_column(&self, _scope: &EnumerationScope) -> Vec<String> {
        warn!("on {} it is not possible to search columns", self.dialect.name);
        Vec::new()
    }
}
