//! Pivot execution
//!
//! Every enumeration query is run the same way: the level's query is wrapped
//! as a derived table under a fresh alias, and the wanted fields are selected
//! from that alias. This gives the row extractor one uniform query shape no
//! matter which catalog table the level reads from.

use tracing::debug;
use uuid::Uuid;

use super::{Row, RowExtractor, ScalarValue, Strategy};
use crate::error::ExtractionError;

/// One pivot attempt: derived-table source, requested fields and strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub source: String,
    pub alias: String,
    pub fields: Vec<String>,
    pub strategy: Strategy,
}

impl ExtractionRequest {
    /// Build a request with a freshly generated alias
    pub fn new(source: &str, fields: &[&str], strategy: Strategy) -> Self {
        Self {
            source: source.trim().to_string(),
            alias: generate_alias(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            strategy,
        }
    }

    /// Requested columns qualified with the derived-table alias
    pub fn qualified_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{}.{}", self.alias, f))
            .collect()
    }

    /// The composed query handed to the row extractor
    pub fn query(&self) -> String {
        format!(
            "SELECT {} FROM ({}) AS {}",
            self.qualified_columns().join(", "),
            self.source,
            self.alias
        )
    }
}

/// Alias for a derived table: a letter followed by random hex digits
fn generate_alias() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("p{}", &id[..12])
}

/// Column-oriented result of a pivot
///
/// Values of different columns at the same position belong to the same
/// source row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    alias: String,
    columns: Vec<(String, Vec<ScalarValue>)>,
}

impl ExtractionResult {
    fn from_rows(request: &ExtractionRequest, rows: &[Row]) -> Self {
        let columns = request
            .fields
            .iter()
            .zip(request.qualified_columns())
            .enumerate()
            .map(|(index, (field, qualified))| {
                let values: Vec<ScalarValue> = rows
                    .iter()
                    .map(|row| {
                        row.get(&qualified)
                            .or_else(|| row.get(field))
                            // Positions only line up when the row has exactly the requested shape
                            .or_else(|| {
                                row.get_index(index)
                                    .filter(|_| row.len() == request.fields.len())
                            })
                            .cloned()
                            .unwrap_or(ScalarValue::Null)
                    })
                    .collect();
                (qualified, values)
            })
            .collect();

        Self {
            alias: request.alias.clone(),
            columns,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Values for a column, by qualified name (`alias.field`) or bare field
    pub fn column(&self, name: &str) -> Option<&[ScalarValue]> {
        let qualified = format!("{}.{}", self.alias, name);
        self.columns
            .iter()
            .find(|(k, _)| k == name || *k == qualified)
            .map(|(_, v)| v.as_slice())
    }

    /// Values of the first requested column
    pub fn first_column(&self) -> &[ScalarValue] {
        self.columns
            .first()
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Non-null values of a column rendered as text
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.column(name)
            .unwrap_or(&[])
            .iter()
            .filter_map(ScalarValue::as_text)
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|(_, v)| v.len()).unwrap_or(0)
    }
}

/// Runs pivot requests through a row extractor
///
/// Holds no state besides the extractor reference.
pub struct PivotExecutor<'a> {
    extractor: &'a dyn RowExtractor,
}

impl<'a> PivotExecutor<'a> {
    pub fn new(extractor: &'a dyn RowExtractor) -> Self {
        Self { extractor }
    }

    /// Pivot `source` and fetch `fields` under `strategy`
    ///
    /// Returns `Ok(None)` when the strategy produced no rows.
    pub fn pivot(
        &self,
        source: &str,
        fields: &[&str],
        strategy: Strategy,
    ) -> Result<Option<ExtractionResult>, ExtractionError> {
        let request = ExtractionRequest::new(source, fields, strategy);
        self.execute(&request)
    }

    pub fn execute(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Option<ExtractionResult>, ExtractionError> {
        let query = request.query();
        debug!("pivot [{}]: {}", request.strategy, query);

        let rows = self.extractor.execute(&query, request.strategy)?;
        if rows.is_empty() {
            debug!("pivot [{}] returned no rows", request.strategy);
            return Ok(None);
        }

        Ok(Some(ExtractionResult::from_rows(request, &rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::mock::ScriptedExtractor;

    #[test]
    fn test_request_query_shape() {
        let request = ExtractionRequest::new(
            "SELECT name FROM master..syslogins",
            &["name"],
            Strategy::Direct,
        );
        let alias = request.alias.clone();
        assert!(alias.starts_with('p'));
        assert_eq!(alias.len(), 13);
        assert_eq!(
            request.query(),
            format!(
                "SELECT {alias}.name FROM (SELECT name FROM master..syslogins) AS {alias}"
            )
        );
    }

    #[test]
    fn test_aliases_are_unique() {
        let a = ExtractionRequest::new("SELECT 1", &["name"], Strategy::Direct);
        let b = ExtractionRequest::new("SELECT 1", &["name"], Strategy::Direct);
        assert_ne!(a.alias, b.alias);
    }

    #[test]
    fn test_pivot_reshapes_rows() {
        let extractor = ScriptedExtractor::new().on_rows(
            "syscolumns",
            Strategy::Direct,
            vec![
                Row::from_pairs([("name", ScalarValue::from("id")), ("usertype", ScalarValue::Integer(7))]),
                Row::from_pairs([("name", ScalarValue::from("total")), ("usertype", ScalarValue::Integer(10))]),
            ],
        );
        let pivot = PivotExecutor::new(&extractor);

        let result = pivot
            .pivot("SELECT name, usertype FROM syscolumns", &["name", "usertype"], Strategy::Direct)
            .unwrap()
            .unwrap();

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.texts("name"), vec!["id", "total"]);
        assert_eq!(
            result.column("usertype").unwrap(),
            &[ScalarValue::Integer(7), ScalarValue::Integer(10)]
        );
        let qualified = format!("{}.name", result.alias());
        assert_eq!(result.column(&qualified).map(|v| v.len()), Some(2));
        assert_eq!(extractor.call_count(), 1);
    }

    #[test]
    fn test_pivot_positional_and_missing_values() {
        let mut row = Row::new();
        row.push("col0", ScalarValue::from("alice"));
        let extractor = ScriptedExtractor::new().on_rows("syslogins", Strategy::Inferential, vec![row]);
        let pivot = PivotExecutor::new(&extractor);

        let result = pivot
            .pivot("SELECT name FROM syslogins", &["name"], Strategy::Inferential)
            .unwrap()
            .unwrap();
        assert_eq!(result.first_column(), &[ScalarValue::from("alice")]);

        let result = pivot
            .pivot("SELECT name FROM syslogins", &["name", "usertype"], Strategy::Inferential)
            .unwrap()
            .unwrap();
        assert_eq!(result.first_column(), &[ScalarValue::Null]);
        assert_eq!(result.column("usertype").unwrap(), &[ScalarValue::Null]);
    }

    #[test]
    fn test_pivot_ignores_unrelated_columns() {
        let extractor = ScriptedExtractor::new().on_rows(
            "syscolumns",
            Strategy::Direct,
            vec![Row::from_pairs([
                ("name", ScalarValue::from("id")),
                ("status", ScalarValue::Integer(8)),
            ])],
        );
        let pivot = PivotExecutor::new(&extractor);

        let result = pivot
            .pivot("SELECT name, status FROM syscolumns", &["name", "usertype"], Strategy::Direct)
            .unwrap()
            .unwrap();
        assert_eq!(result.texts("name"), vec!["id"]);
        assert_eq!(result.column("usertype").unwrap(), &[ScalarValue::Null]);
    }

    #[test]
    fn test_pivot_absent_and_failure() {
        let extractor = ScriptedExtractor::new().fail("broken", Strategy::Direct, "timeout");
        let pivot = PivotExecutor::new(&extractor);

        assert_eq!(pivot.pivot("SELECT 1 AS name", &["name"], Strategy::Direct), Ok(None));

        let err = pivot
            .pivot("SELECT name FROM broken", &["name"], Strategy::Direct)
            .unwrap_err();
        assert_eq!(err.strategy, Strategy::Direct);
        assert_eq!(err.message, "timeout");
    }
}
