//! Row extractor for SQLite targets

use rusqlite::types::ValueRef;
use tracing::debug;

use super::DatabaseConn;
use crate::error::ExtractionError;
use crate::extract::{Row, RowExtractor, ScalarValue, Strategy};

/// Direct-access extractor over a [`DatabaseConn`]
///
/// `Direct` runs the composed query as-is. `Inferential` behaves like a
/// channel that can only return one scalar per request: it first asks for the
/// row count, then fetches every cell with its own query, and hands all
/// values back as text.
pub struct SqliteExtractor {
    db: DatabaseConn,
}

impl SqliteExtractor {
    pub fn new(db: DatabaseConn) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConn {
        &self.db
    }

    fn fetch_rows(&self, query: &str, strategy: Strategy) -> Result<Vec<Row>, ExtractionError> {
        let mut stmt = self
            .db
            .conn
            .prepare(query)
            .map_err(|e| ExtractionError::new(strategy, e.to_string()))?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt
            .query([])
            .map_err(|e| ExtractionError::new(strategy, e.to_string()))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| ExtractionError::new(strategy, e.to_string()))?
        {
            let mut out = Row::new();
            for (index, name) in names.iter().enumerate() {
                let value = row
                    .get_ref(index)
                    .map(to_scalar)
                    .map_err(|e| ExtractionError::new(strategy, e.to_string()))?;
                out.push(name.clone(), value);
            }
            result.push(out);
        }

        Ok(result)
    }

    fn fetch_scalar(&self, query: &str) -> Result<ScalarValue, ExtractionError> {
        self.db
            .conn
            .query_row(query, [], |row| row.get_ref(0).map(to_scalar))
            .map_err(|e| ExtractionError::new(Strategy::Inferential, e.to_string()))
    }

    fn fetch_inferential(&self, query: &str) -> Result<Vec<Row>, ExtractionError> {
        let names = {
            let stmt = self
                .db
                .conn
                .prepare(query)
                .map_err(|e| ExtractionError::new(Strategy::Inferential, e.to_string()))?;
            stmt.column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        };

        let count = self
            .fetch_scalar(&format!("SELECT COUNT(*) FROM ({})", query))?
            .as_integer()
            .unwrap_or(0);
        debug!("inferential: {} row(s), {} column(s)", count, names.len());

        let mut result = Vec::new();
        for offset in 0..count {
            let mut out = Row::new();
            for (index, name) in names.iter().enumerate() {
                let cell = format!("SELECT * FROM ({}) LIMIT 1 OFFSET {}", query, offset);
                let value = self
                    .db
                    .conn
                    .query_row(&cell, [], |row| row.get_ref(index).map(to_scalar))
                    .map_err(|e| ExtractionError::new(Strategy::Inferential, e.to_string()))?;
                // The channel only ever sees the textual form
                let value = value
                    .as_text()
                    .map(ScalarValue::Text)
                    .unwrap_or(ScalarValue::Null);
                out.push(name.clone(), value);
            }
            result.push(out);
        }

        Ok(result)
    }
}

impl RowExtractor for SqliteExtractor {
    fn execute(&self, query: &str, strategy: Strategy) -> Result<Vec<Row>, ExtractionError> {
        match strategy {
            Strategy::Direct => self.fetch_rows(query, strategy),
            Strategy::Inferential => self.fetch_inferential(query),
        }
    }
}

fn to_scalar(value: ValueRef<'_>) -> ScalarValue {
    match value {
        ValueRef::Null => ScalarValue::Null,
        ValueRef::Integer(i) => ScalarValue::Integer(i),
        ValueRef::Real(r) => ScalarValue::Real(r),
        ValueRef::Text(t) => ScalarValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => ScalarValue::Text(String::from_utf8_lossy(b).into_owned()),
    }
}
