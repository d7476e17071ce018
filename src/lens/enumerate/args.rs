//! Enumeration lens arguments
//!
//! The scope of an enumeration call. Used as clap arguments by the CLI and
//! as a serde payload by library callers.

use serde::{Deserialize, Serialize};

use crate::error::{EnumerationError, EnumerationResult};
use crate::identifier::{is_multi_scope, split_scope};

/// Sentinel database name meaning "the database the target is connected to"
pub const CURRENT_DB_TOKEN: &str = "CD";

/// Caller-supplied scope for an enumeration call
///
/// Every field is optional; missing fields are resolved by enumerating the
/// level above (databases for tables, tables for columns, users for
/// privileges).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct EnumerationScope {
    /// Database(s) to enumerate, comma separated (`CD` for the current database)
    #[cfg_attr(feature = "cli", clap(short = 'D', long = "db", value_name = "DB"))]
    #[serde(default)]
    pub db: Option<String>,

    /// Table(s) to enumerate, comma separated
    #[cfg_attr(feature = "cli", clap(short = 'T', long = "tbl", value_name = "TBL"))]
    #[serde(default)]
    pub tbl: Option<String>,

    /// User to check
    #[cfg_attr(feature = "cli", clap(short = 'U', long = "user", value_name = "USER"))]
    #[serde(default)]
    pub user: Option<String>,
}

impl EnumerationScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, db: &str) -> Self {
        self.db = Some(db.to_string());
        self
    }

    pub fn with_tables(mut self, tbl: &str) -> Self {
        self.tbl = Some(tbl.to_string());
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Database entries named by the caller, `None` when no database was given
    pub fn databases(&self) -> EnumerationResult<Option<Vec<String>>> {
        self.db
            .as_deref()
            .map(|list| non_empty_entries(list, "database"))
            .transpose()
    }

    /// The single database named by the caller
    ///
    /// A list naming more than one database is rejected.
    pub fn single_database(&self) -> EnumerationResult<Option<String>> {
        match self.db.as_deref() {
            None => Ok(None),
            Some(list) if is_multi_scope(list) => Err(EnumerationError::Configuration(
                "only one database name is allowed when enumerating the tables' columns"
                    .to_string(),
            )),
            Some(list) => {
                let mut entries = non_empty_entries(list, "database")?;
                Ok(entries.pop())
            }
        }
    }

    /// Table entries named by the caller
    pub fn tables(&self) -> EnumerationResult<Option<Vec<String>>> {
        self.tbl
            .as_deref()
            .map(|list| non_empty_entries(list, "table"))
            .transpose()
    }

    /// The user named by the caller, ignoring blank input
    pub fn user(&self) -> Option<&str> {
        self.user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Whether a database entry refers to the current database
pub fn is_current_db(name: &str) -> bool {
    name.trim() == CURRENT_DB_TOKEN
}

fn non_empty_entries(list: &str, kind: &str) -> EnumerationResult<Vec<String>> {
    let entries = split_scope(list);
    if entries.iter().any(|e| e.is_empty()) {
        return Err(EnumerationError::Configuration(format!(
            "empty {} name in '{}'",
            kind, list
        )));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_list() {
        let scope = EnumerationScope::new().with_db("prod, dev");
        assert_eq!(
            scope.databases().unwrap(),
            Some(vec!["prod".to_string(), "dev".to_string()])
        );
        assert_eq!(EnumerationScope::new().databases().unwrap(), None);
    }

    #[test]
    fn test_empty_entries_rejected() {
        let scope = EnumerationScope::new().with_db("prod,,dev");
        assert!(matches!(
            scope.databases(),
            Err(EnumerationError::Configuration(_))
        ));

        let scope = EnumerationScope::new().with_tables(" ");
        assert!(matches!(scope.tables(), Err(EnumerationError::Configuration(_))));
    }

    #[test]
    fn test_single_database() {
        let scope = EnumerationScope::new().with_db(" prod ");
        assert_eq!(scope.single_database().unwrap(), Some("prod".to_string()));

        let scope = EnumerationScope::new().with_db("prod,dev");
        assert!(matches!(
            scope.single_database(),
            Err(EnumerationError::Configuration(_))
        ));
    }

    #[test]
    fn test_user_and_current_db() {
        assert_eq!(EnumerationScope::new().with_user("  ").user(), None);
        assert_eq!(EnumerationScope::new().with_user(" sa ").user(), Some("sa"));
        assert!(is_current_db(" CD "));
        assert!(!is_current_db("cd"));
        assert!(!is_current_db("cdr"));
    }

    #[test]
    fn test_deserialize_partial_scope() {
        let scope: EnumerationScope = serde_json::from_str(r#"{"db": "prod"}"#).unwrap();
        assert_eq!(scope, EnumerationScope::new().with_db("prod"));
    }
}
