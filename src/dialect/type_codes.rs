//! Type-code lookup tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extract::ScalarValue;

/// Sybase `syscolumns.usertype` codes
const SYBASE_TYPES: &[(i64, &str)] = &[
    (1, "char"),
    (2, "varchar"),
    (3, "binary"),
    (4, "varbinary"),
    (5, "tinyint"),
    (6, "smallint"),
    (7, "int"),
    (8, "float"),
    (10, "numeric"),
    (11, "money"),
    (12, "datetime"),
    (13, "intn"),
    (14, "floatn"),
    (15, "datetimn"),
    (16, "bit"),
    (17, "moneyn"),
    (18, "sysname"),
    (19, "text"),
    (20, "image"),
    (21, "smallmoney"),
    (22, "smalldatetime"),
    (23, "real"),
    (24, "nchar"),
    (25, "nvarchar"),
    (26, "decimal"),
    (27, "decimaln"),
    (28, "numericn"),
    (80, "timestamp"),
];

/// Codes produced by the SQLite columns template (type affinities)
const SQLITE_TYPES: &[(i64, &str)] = &[
    (1, "integer"),
    (2, "text"),
    (3, "real"),
    (4, "blob"),
    (5, "numeric"),
];

/// Maps dialect-specific integer type codes to type names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCodeLookup {
    codes: BTreeMap<i64, String>,
}

impl TypeCodeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sybase() -> Self {
        SYBASE_TYPES.iter().map(|(c, n)| (*c, *n)).collect()
    }

    pub fn sqlite() -> Self {
        SQLITE_TYPES.iter().map(|(c, n)| (*c, *n)).collect()
    }

    pub fn insert(&mut self, code: i64, name: impl Into<String>) {
        self.codes.insert(code, name.into());
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    /// Resolve a raw type-code value; null, zero and unknown codes are `None`
    pub fn resolve(&self, value: &ScalarValue) -> Option<String> {
        match value.as_integer() {
            Some(0) | None => None,
            Some(code) => self.get(code).map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for TypeCodeLookup {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(|(c, n)| (c, n.into())).collect(),
        }
    }
}
