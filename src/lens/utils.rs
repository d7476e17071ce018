//! Output helpers shared by lens consumers
//!
//! [`OutputFormat`] names the renderings the command line offers;
//! [`format_rows`] turns a list of flat row types into any of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for enumeration results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Rounded table (default)
    #[default]
    Table,
    Markdown,
    /// Compact JSON array
    Json,
    JsonPretty,
    /// One JSON object per line
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

const FORMAT_NAMES: &[&str] = &[
    "table",
    "markdown",
    "json",
    "json-pretty",
    "json-line",
    "psv",
];

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Markdown)
    }

    pub fn all_names() -> &'static [&'static str] {
        FORMAT_NAMES
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
            Self::JsonLine => "json-line",
            Self::Psv => "psv",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                FORMAT_NAMES.join(", ")
            )),
        }
    }
}

/// Render rows in the requested format
#[cfg(feature = "display")]
pub fn format_rows<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<String>
where
    T: tabled::Tabled + Serialize,
{
    use anyhow::anyhow;
    use tabled::settings::Style;
    use tabled::Table;

    let out = match format {
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        OutputFormat::Markdown => Table::new(rows).with(Style::markdown()).to_string(),
        OutputFormat::Json => serde_json::to_string(rows)
            .map_err(|e| anyhow!("Failed to serialize to JSON: {}", e))?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(rows)
            .map_err(|e| anyhow!("Failed to serialize to JSON: {}", e))?,
        OutputFormat::JsonLine => {
            let mut lines = Vec::with_capacity(rows.len());
            for row in rows {
                lines.push(
                    serde_json::to_string(row)
                        .map_err(|e| anyhow!("Failed to serialize to JSON: {}", e))?,
                );
            }
            lines.join("\n")
        }
        OutputFormat::Psv => {
            let mut lines = vec![T::headers().join("|")];
            lines.extend(rows.iter().map(|row| row.fields().join("|")));
            lines.join("\n")
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trip_names() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(&format.to_string(), name);
        }
        assert_eq!(OutputFormat::from_str(" MD ").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::JsonLine);
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_output_format_kinds() {
        assert!(OutputFormat::JsonLine.is_json());
        assert!(!OutputFormat::Psv.is_json());
        assert!(OutputFormat::Markdown.is_table());
        assert!(!OutputFormat::Json.is_table());
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_format_rows() {
        use crate::lens::enumerate::TableRow;

        let rows = vec![
            TableRow {
                database: "prod".to_string(),
                table: "orders".to_string(),
            },
            TableRow {
                database: "prod".to_string(),
                table: "items".to_string(),
            },
        ];

        assert_eq!(
            format_rows(&rows, OutputFormat::Psv).unwrap(),
            "database|table\nprod|orders\nprod|items"
        );
        assert_eq!(
            format_rows(&rows, OutputFormat::JsonLine).unwrap(),
            "{\"database\":\"prod\",\"table\":\"orders\"}\n{\"database\":\"prod\",\"table\":\"items\"}"
        );
        assert!(format_rows(&rows, OutputFormat::Markdown)
            .unwrap()
            .contains("| orders |"));
    }
}
