//! Per-level query templates
//!
//! Templates use named placeholders that the enumeration lens fills in with
//! the resolved scope:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{db}` | database name in safe identifier form |
//! | `{db_literal}` | raw database name, escaped for a string literal |
//! | `{tbl}` | raw table name, escaped for a string literal |
//! | `{user}` | raw user name, escaped for a string literal |
//!
//! Every template must expose a `name` column. The columns template also
//! exposes `usertype`, an integer type code resolved through the dialect's
//! type-code lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column every level template exposes
pub const NAME_FIELD: &str = "name";

/// Type-code column exposed by the columns template
pub const TYPE_FIELD: &str = "usertype";

/// Enumeration levels that have a query template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Users,
    Databases,
    Tables,
    Columns,
    CurrentDatabase,
    Administrator,
}

impl Level {
    /// Human-readable description used in log and error messages
    pub fn description(&self) -> &'static str {
        match self {
            Level::Users => "database users",
            Level::Databases => "database names",
            Level::Tables => "tables",
            Level::Columns => "columns",
            Level::CurrentDatabase => "current database",
            Level::Administrator => "administrator status",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Query templates for one dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplates {
    pub users: String,
    pub databases: String,
    pub tables: String,
    pub columns: String,
    #[serde(default)]
    pub current_database: Option<String>,
    #[serde(default)]
    pub is_admin: Option<String>,
}

impl QueryTemplates {
    /// Template for a level, if the dialect provides one
    pub fn get(&self, level: Level) -> Option<&str> {
        match level {
            Level::Users => Some(self.users.as_str()),
            Level::Databases => Some(self.databases.as_str()),
            Level::Tables => Some(self.tables.as_str()),
            Level::Columns => Some(self.columns.as_str()),
            Level::CurrentDatabase => self.current_database.as_deref(),
            Level::Administrator => self.is_admin.as_deref(),
        }
    }
}

/// Substitute `{key}` placeholders in one left-to-right pass
///
/// Unknown placeholders are left in place. Substituted values are never
/// scanned again, so a name containing `{tbl}` stays as it is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail.find('}').and_then(|end| {
            let key = &tail[1..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end + 1))
        });
        match value {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
