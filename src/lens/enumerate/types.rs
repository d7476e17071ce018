//! Enumeration lens types
//!
//! Flat row types for rendering enumeration results as tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

use crate::database::{PrivilegeEntry, TableColumns};

/// One discovered name (user or database)
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq, Eq)]
pub struct NameRow {
    pub name: String,
}

/// One table of one database
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq, Eq)]
pub struct TableRow {
    pub database: String,
    pub table: String,
}

/// One column of one table
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq, Eq)]
pub struct ColumnRow {
    pub database: String,
    pub table: String,
    pub column: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Administrator status of one user
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq, Eq)]
pub struct PrivilegeRow {
    pub user: String,
    pub administrator: String,
}

impl NameRow {
    pub fn from_names(names: &[String]) -> Vec<Self> {
        names
            .iter()
            .map(|n| NameRow { name: n.clone() })
            .collect()
    }
}

impl TableRow {
    pub fn from_map(tables: &BTreeMap<String, Vec<String>>) -> Vec<Self> {
        tables
            .iter()
            .flat_map(|(db, tbls)| {
                tbls.iter().map(move |t| TableRow {
                    database: db.clone(),
                    table: t.clone(),
                })
            })
            .collect()
    }
}

impl ColumnRow {
    pub fn from_map(columns: &BTreeMap<String, TableColumns>) -> Vec<Self> {
        columns
            .iter()
            .flat_map(|(db, tables)| {
                tables.iter().flat_map(move |(tbl, cols)| {
                    cols.iter().map(move |(col, ty)| ColumnRow {
                        database: db.clone(),
                        table: tbl.clone(),
                        column: col.clone(),
                        type_name: ty.clone().unwrap_or_else(|| "unknown".to_string()),
                    })
                })
            })
            .collect()
    }
}

impl PrivilegeRow {
    pub fn from_map(privileges: &BTreeMap<String, PrivilegeEntry>) -> Vec<Self> {
        privileges
            .iter()
            .map(|(user, entry)| PrivilegeRow {
                user: user.clone(),
                administrator: match entry.is_admin {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "unknown",
                }
                .to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_tables() {
        let mut tables = BTreeMap::new();
        tables.insert("dev".to_string(), vec!["scratch".to_string()]);
        tables.insert(
            "prod".to_string(),
            vec!["orders".to_string(), "customers".to_string()],
        );

        let rows = TableRow::from_map(&tables);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].database, "dev");
        assert_eq!(rows[2].table, "customers");
    }

    #[test]
    fn test_unknown_types_and_flags() {
        let mut cols = crate::database::ColumnMap::new();
        cols.insert("blob".to_string(), None);
        let mut tables = TableColumns::new();
        tables.insert("orders".to_string(), cols);
        let columns = BTreeMap::from([("prod".to_string(), tables)]);
        let rows = ColumnRow::from_map(&columns);
        assert_eq!(rows[0].database, "prod");
        assert_eq!(rows[0].type_name, "unknown");

        let mut privileges = BTreeMap::new();
        privileges.insert("probe".to_string(), PrivilegeEntry::default());
        assert_eq!(PrivilegeRow::from_map(&privileges)[0].administrator, "unknown");
    }
}
