//! Extraction layer
//!
//! This module defines the seams between the enumeration lens and the target:
//!
//! - [`RowExtractor`]: runs one composed query under a [`Strategy`] and returns rows
//! - [`AdministratorProbe`]: answers "is this user an administrator"
//! - [`TechniqueSelector`]: orders the strategies worth trying for a target
//! - [`PivotExecutor`]: wraps a sub-query as a uniquely aliased derived table and
//!   returns the requested columns in column-oriented form
//!
//! # Architecture
//!
//! ```text
//! extract/
//! ├── selector   # confirmed techniques -> ordered strategies
//! ├── pivot      # derived-table wrapping, row -> column reshaping
//! └── probe      # template-driven administrator probe
//! ```

mod pivot;
mod probe;
mod selector;

pub use pivot::{ExtractionRequest, ExtractionResult, PivotExecutor};
pub use probe::TemplateAdminProbe;
pub use selector::TechniqueSelector;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExtractionError;

/// How rows are pulled out of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Techniques that return whole result sets in one round trip
    Direct,
    /// Techniques that infer one scalar value at a time
    Inferential,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => write!(f, "direct"),
            Strategy::Inferential => write!(f, "inferential"),
        }
    }
}

/// Data-retrieval techniques that may be confirmed usable against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    /// Boolean-based blind
    Boolean,
    /// Error-based
    Error,
    /// UNION query
    Union,
    /// Stacked queries
    Stacked,
    /// Time-based blind
    Time,
}

impl Technique {
    /// Whether the technique can return several rows in a single response
    pub fn returns_rows(&self) -> bool {
        matches!(self, Technique::Union | Technique::Error)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Technique::Boolean => "boolean",
            Technique::Error => "error",
            Technique::Union => "union",
            Technique::Stacked => "stacked",
            Technique::Time => "time",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Technique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b" | "boolean" => Ok(Technique::Boolean),
            "e" | "error" => Ok(Technique::Error),
            "u" | "union" => Ok(Technique::Union),
            "s" | "stacked" => Ok(Technique::Stacked),
            "t" | "time" => Ok(Technique::Time),
            other => Err(format!(
                "Unknown technique '{}'. Valid techniques: boolean, error, union, stacked, time",
                other
            )),
        }
    }
}

/// A single scalar value returned by the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ScalarValue {
    /// Render the value as text; `None` for NULL
    pub fn as_text(&self) -> Option<String> {
        match self {
            ScalarValue::Null => None,
            ScalarValue::Integer(i) => Some(i.to_string()),
            ScalarValue::Real(r) => Some(r.to_string()),
            ScalarValue::Text(s) => Some(s.clone()),
        }
    }

    /// Interpret the value as an integer when it carries one
    ///
    /// Inferential channels hand everything back as text, so numeric strings
    /// are accepted too.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ScalarValue::Null => None,
            ScalarValue::Integer(i) => Some(*i),
            ScalarValue::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            ScalarValue::Real(_) => None,
            ScalarValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

/// One result row: column names paired with values, in select-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, ScalarValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: ScalarValue) {
        self.columns.push((name.into(), value));
    }

    /// Look up a value by column name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.columns
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn get_index(&self, index: usize) -> Option<&ScalarValue> {
        self.columns.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Executes a composed query against the target under one strategy
///
/// Implementations own transport, retries and timeouts. Returning an empty
/// vector means the strategy legitimately produced no rows.
pub trait RowExtractor {
    fn execute(&self, query: &str, strategy: Strategy) -> Result<Vec<Row>, ExtractionError>;
}

/// Answers whether a user holds administrative rights on the target
///
/// `None` means the answer could not be determined.
pub trait AdministratorProbe {
    fn is_administrator(&self, user: &str) -> Option<bool>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted extractor for tests

    use super::*;
    use std::cell::RefCell;

    type Response = Result<Vec<Row>, ExtractionError>;

    /// Answers queries by matching substrings, recording every call
    #[derive(Default)]
    pub struct ScriptedExtractor {
        rules: Vec<(String, Strategy, Response)>,
        calls: RefCell<Vec<(String, Strategy)>>,
    }

    impl ScriptedExtractor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Respond with a single column of text values
        pub fn on(mut self, needle: &str, strategy: Strategy, column: &str, values: &[&str]) -> Self {
            let rows = values
                .iter()
                .map(|v| Row::from_pairs([(column, *v)]))
                .collect();
            self.rules.push((needle.to_string(), strategy, Ok(rows)));
            self
        }

        pub fn on_rows(mut self, needle: &str, strategy: Strategy, rows: Vec<Row>) -> Self {
            self.rules.push((needle.to_string(), strategy, Ok(rows)));
            self
        }

        pub fn fail(mut self, needle: &str, strategy: Strategy, message: &str) -> Self {
            self.rules.push((
                needle.to_string(),
                strategy,
                Err(ExtractionError::new(strategy, message)),
            ));
            self
        }

        pub fn calls(&self) -> Vec<(String, Strategy)> {
            self.calls.borrow().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn calls_matching(&self, needle: &str) -> Vec<Strategy> {
            self.calls
                .borrow()
                .iter()
                .filter(|(q, _)| q.contains(needle))
                .map(|(_, s)| *s)
                .collect()
        }
    }

    impl RowExtractor for ScriptedExtractor {
        fn execute(&self, query: &str, strategy: Strategy) -> Result<Vec<Row>, ExtractionError> {
            self.calls.borrow_mut().push((query.to_string(), strategy));
            self.rules
                .iter()
                .find(|(needle, s, _)| *s == strategy && query.contains(needle.as_str()))
                .map(|(_, _, response)| response.clone())
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technique_from_str() {
        assert_eq!("union".parse::<Technique>(), Ok(Technique::Union));
        assert_eq!("E".parse::<Technique>(), Ok(Technique::Error));
        assert_eq!(" time ".parse::<Technique>(), Ok(Technique::Time));
        assert!("inline".parse::<Technique>().is_err());
    }

    #[test]
    fn test_technique_returns_rows() {
        assert!(Technique::Union.returns_rows());
        assert!(Technique::Error.returns_rows());
        assert!(!Technique::Boolean.returns_rows());
        assert!(!Technique::Time.returns_rows());
        assert!(!Technique::Stacked.returns_rows());
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(ScalarValue::Text(" 7 ".to_string()).as_integer(), Some(7));
        assert_eq!(ScalarValue::Real(5.0).as_integer(), Some(5));
        assert_eq!(ScalarValue::Real(5.5).as_integer(), None);
        assert_eq!(ScalarValue::Text("int".to_string()).as_integer(), None);
        assert_eq!(ScalarValue::Null.as_text(), None);
        assert_eq!(ScalarValue::Integer(3).as_text(), Some("3".to_string()));
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::from_pairs([("Name", ScalarValue::from("alice")), ("usertype", ScalarValue::Integer(2))]);
        assert_eq!(row.get("name"), Some(&ScalarValue::from("alice")));
        assert_eq!(row.get_index(1), Some(&ScalarValue::Integer(2)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }
}
