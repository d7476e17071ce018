//! Error types for catalog enumeration.

use thiserror::Error;

use crate::extract::Strategy;

/// A row extractor could not run a query under the requested strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("extraction failed under {strategy} strategy: {message}")]
pub struct ExtractionError {
    pub strategy: Strategy,
    pub message: String,
}

impl ExtractionError {
    pub fn new(strategy: Strategy, message: impl Into<String>) -> Self {
        Self {
            strategy,
            message: message.into(),
        }
    }
}

/// Errors that cross the public boundary of the enumeration lens.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// Every strategy of a level failed and nothing was cached for the scope.
    #[error("unable to retrieve {level}: {source}")]
    ExtractionFailed {
        level: &'static str,
        #[source]
        source: ExtractionError,
    },

    /// The caller supplied an invalid combination of options.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Prerequisite resolution produced an empty scope.
    #[error("no data available: {0}")]
    NoDataAvailable(String),
}

pub type EnumerationResult<T> = Result<T, EnumerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EnumerationError::ExtractionFailed {
            level: "database users",
            source: ExtractionError::new(Strategy::Direct, "connection reset"),
        };
        assert_eq!(
            err.to_string(),
            "unable to retrieve database users: extraction failed under direct strategy: connection reset"
        );

        let err = EnumerationError::Configuration("only one database".to_string());
        assert_eq!(err.to_string(), "configuration error: only one database");
    }
}
