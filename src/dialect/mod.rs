//! Dialects
//!
//! A dialect bundles everything the enumeration lens needs to know about a
//! target family without knowing how to talk to it:
//!
//! - query templates per enumeration level ([`QueryTemplates`])
//! - the integer type-code table used by the columns level ([`TypeCodeLookup`])
//! - the identifier quoting style used by the identifier normalizer
//!
//! Two dialects are built in (`sybase`, `sqlite`). Custom dialects are read
//! from TOML:
//!
//! ```toml
//! name = "custom"
//! quote = "double-quotes"
//!
//! [templates]
//! users = "SELECT usename AS name FROM pg_user"
//! databases = "SELECT datname AS name FROM pg_database"
//! tables = "SELECT tablename AS name FROM pg_tables WHERE schemaname = '{db_literal}'"
//! columns = "SELECT attname AS name, atttypid AS usertype FROM ..."
//!
//! [type_codes]
//! 23 = "int4"
//! 25 = "text"
//! ```

mod templates;
mod type_codes;

pub use templates::{render, Level, QueryTemplates, NAME_FIELD, TYPE_FIELD};
pub use type_codes::TypeCodeLookup;

use anyhow::{anyhow, Result};
use config::Config;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::identifier::{self, QuoteStyle};

/// Names of the built-in dialects
pub const BUILTIN_DIALECTS: &[&str] = &["sybase", "sqlite"];

/// Templates, type codes and quoting for one target family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub name: String,
    pub quote: QuoteStyle,
    pub templates: QueryTemplates,
    pub type_codes: TypeCodeLookup,
}

#[derive(Debug, Deserialize)]
struct DialectDefinition {
    name: String,
    #[serde(default)]
    quote: QuoteStyle,
    templates: QueryTemplates,
    #[serde(default)]
    type_codes: HashMap<String, String>,
}

impl Dialect {
    /// Sybase Adaptive Server catalog queries
    pub fn sybase() -> Self {
        Self {
            name: "sybase".to_string(),
            quote: QuoteStyle::Brackets,
            templates: QueryTemplates {
                users: "SELECT name FROM master..syslogins".to_string(),
                databases: "SELECT name FROM master..sysdatabases".to_string(),
                tables: "SELECT name FROM {db}..sysobjects WHERE type IN ('U', 'V')".to_string(),
                columns: "SELECT {db}..syscolumns.name, {db}..syscolumns.usertype \
                          FROM {db}..syscolumns, {db}..sysobjects \
                          WHERE {db}..syscolumns.id={db}..sysobjects.id \
                          AND {db}..sysobjects.name='{tbl}'"
                    .to_string(),
                current_database: Some("SELECT DB_NAME() AS name".to_string()),
                is_admin: Some(
                    "SELECT COUNT(*) AS name \
                     FROM master..syslogins l, master..sysloginroles lr, master..syssrvroles r \
                     WHERE l.suid=lr.suid AND lr.srid=r.srid \
                     AND r.name='sa_role' AND l.name='{user}'"
                        .to_string(),
                ),
            },
            type_codes: TypeCodeLookup::sybase(),
        }
    }

    /// SQLite schema queries (attached schemas play the role of databases)
    pub fn sqlite() -> Self {
        Self {
            name: "sqlite".to_string(),
            quote: QuoteStyle::DoubleQuotes,
            templates: QueryTemplates {
                // SQLite has no login catalog
                users: "SELECT NULL AS name WHERE 0".to_string(),
                databases: "SELECT name FROM pragma_database_list".to_string(),
                tables: "SELECT name FROM {db}.sqlite_master WHERE type IN ('table', 'view')"
                    .to_string(),
                columns: "SELECT name, CASE \
                          WHEN type = '' THEN 0 \
                          WHEN type LIKE '%INT%' THEN 1 \
                          WHEN type LIKE '%CHAR%' OR type LIKE '%CLOB%' OR type LIKE '%TEXT%' THEN 2 \
                          WHEN type LIKE '%BLOB%' THEN 4 \
                          WHEN type LIKE '%REAL%' OR type LIKE '%FLOA%' OR type LIKE '%DOUB%' THEN 3 \
                          ELSE 5 END AS usertype \
                          FROM pragma_table_info('{tbl}', '{db_literal}')"
                    .to_string(),
                current_database: Some("SELECT 'main' AS name".to_string()),
                is_admin: None,
            },
            type_codes: TypeCodeLookup::sqlite(),
        }
    }

    /// Look up a built-in dialect by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "sybase" | "ase" => Some(Self::sybase()),
            "sqlite" | "sqlite3" => Some(Self::sqlite()),
            _ => None,
        }
    }

    /// Load a dialect definition from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(anyhow!("Dialect file '{}' does not exist", path));
        }

        let settings = Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| anyhow!("Failed to read dialect file '{}': {}", path, e))?;

        let definition = settings
            .try_deserialize::<DialectDefinition>()
            .map_err(|e| anyhow!("Failed to parse dialect file '{}': {}", path, e))?;

        let mut type_codes = TypeCodeLookup::new();
        for (code, name) in definition.type_codes {
            let code: i64 = code
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid type code '{}' in dialect file '{}'", code, path))?;
            type_codes.insert(code, name);
        }

        Ok(Self {
            name: definition.name,
            quote: definition.quote,
            templates: definition.templates,
            type_codes,
        })
    }

    /// Resolve a dialect: a definition file wins over a built-in name
    pub fn resolve(name: &str, file: Option<&str>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::builtin(name).ok_or_else(|| {
                anyhow!(
                    "Unknown dialect '{}'. Built-in dialects: {}",
                    name,
                    BUILTIN_DIALECTS.join(", ")
                )
            }),
        }
    }

    pub fn safe_name(&self, name: &str) -> String {
        identifier::safe_identifier(name, self.quote)
    }

    pub fn unsafe_name(&self, name: &str) -> String {
        identifier::unsafe_identifier(name, self.quote)
    }

    pub fn literal(&self, name: &str) -> String {
        identifier::literal(name, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(Dialect::builtin("Sybase").map(|d| d.name), Some("sybase".to_string()));
        assert_eq!(Dialect::builtin("sqlite3").map(|d| d.name), Some("sqlite".to_string()));
        assert!(Dialect::builtin("oracle").is_none());
        assert!(Dialect::resolve("oracle", None).is_err());
    }

    #[test]
    fn test_sybase_templates() {
        let dialect = Dialect::sybase();
        let sql = render(
            &dialect.templates.columns,
            &[("db", "prod"), ("tbl", "orders")],
        );
        assert!(sql.contains("prod..syscolumns.usertype"));
        assert!(sql.contains("prod..sysobjects.name='orders'"));
        assert!(!sql.contains('{'));
        assert_eq!(dialect.safe_name("order details"), "[order details]");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
name = "custom"
quote = "double-quotes"

[templates]
users = "SELECT usename AS name FROM pg_user"
databases = "SELECT datname AS name FROM pg_database"
tables = "SELECT tablename AS name FROM pg_tables WHERE schemaname = '{db_literal}'"
columns = "SELECT attname AS name, atttypid AS usertype FROM cols WHERE t = '{tbl}'"

[type_codes]
23 = "int4"
25 = "text"
"#,
        )
        .unwrap();

        let dialect = Dialect::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(dialect.name, "custom");
        assert_eq!(dialect.quote, QuoteStyle::DoubleQuotes);
        assert_eq!(dialect.type_codes.get(23), Some("int4"));
        assert_eq!(dialect.templates.current_database, None);
        assert_eq!(dialect.safe_name("my table"), "\"my table\"");
    }

    #[test]
    fn test_from_missing_file() {
        assert!(Dialect::from_file("/nonexistent/dialect.toml").is_err());
    }
}
