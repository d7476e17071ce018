//! Identifier normalization
//!
//! Names discovered on the target flow back into later queries (a database
//! name becomes part of the table query, a table name part of the column
//! query). Plain identifiers pass through untouched; anything else is wrapped
//! in the dialect's identifier quotes.

use serde::{Deserialize, Serialize};

/// Identifier quoting used by a dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    /// `[name]` (Sybase, SQL Server)
    #[default]
    Brackets,
    /// `"name"` (ANSI, SQLite, PostgreSQL)
    DoubleQuotes,
    /// `` `name` `` (MySQL)
    Backticks,
}

impl QuoteStyle {
    fn delimiters(&self) -> (char, char) {
        match self {
            QuoteStyle::Brackets => ('[', ']'),
            QuoteStyle::DoubleQuotes => ('"', '"'),
            QuoteStyle::Backticks => ('`', '`'),
        }
    }
}

fn is_plain(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '_' | '#' | '@') => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#' | '@'))
}

fn is_wrapped(name: &str, quote: QuoteStyle) -> bool {
    let (open, close) = quote.delimiters();
    name.len() >= 2 && name.starts_with(open) && name.ends_with(close)
}

/// Convert a raw name into a form safe to place in identifier position
pub fn safe_identifier(name: &str, quote: QuoteStyle) -> String {
    let name = name.trim();
    if is_plain(name) || is_wrapped(name, quote) {
        return name.to_string();
    }
    let (open, close) = quote.delimiters();
    let escaped = name.replace(close, &format!("{close}{close}"));
    format!("{open}{escaped}{close}")
}

/// Reverse [`safe_identifier`]; unwrapped names pass through unchanged
pub fn unsafe_identifier(name: &str, quote: QuoteStyle) -> String {
    let name = name.trim();
    if !is_wrapped(name, quote) {
        return name.to_string();
    }
    let (open, close) = quote.delimiters();
    let inner = &name[open.len_utf8()..name.len() - close.len_utf8()];
    inner.replace(&format!("{close}{close}"), &close.to_string())
}

/// Raw name escaped for use inside a single-quoted string literal
pub fn literal(name: &str, quote: QuoteStyle) -> String {
    unsafe_identifier(name, quote).replace('\'', "''")
}

/// Split a comma-separated caller scope into trimmed entries
pub fn split_scope(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

/// Whether a caller scope names more than one entry
pub fn is_multi_scope(list: &str) -> bool {
    list.contains(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(safe_identifier("orders", QuoteStyle::Brackets), "orders");
        assert_eq!(safe_identifier("  master ", QuoteStyle::Brackets), "master");
        assert_eq!(safe_identifier("#tmp$1", QuoteStyle::Brackets), "#tmp$1");
    }

    #[test]
    fn test_special_names_are_wrapped() {
        assert_eq!(
            safe_identifier("order details", QuoteStyle::Brackets),
            "[order details]"
        );
        assert_eq!(safe_identifier("1st", QuoteStyle::DoubleQuotes), "\"1st\"");
        assert_eq!(safe_identifier("a]b", QuoteStyle::Brackets), "[a]]b]");
        assert_eq!(safe_identifier("a\"b", QuoteStyle::DoubleQuotes), "\"a\"\"b\"");
        assert_eq!(safe_identifier("we-ird", QuoteStyle::Backticks), "`we-ird`");
    }

    #[test]
    fn test_safe_is_idempotent() {
        let once = safe_identifier("order details", QuoteStyle::Brackets);
        assert_eq!(safe_identifier(&once, QuoteStyle::Brackets), once);
    }

    #[test]
    fn test_unsafe_reverses_safe() {
        for name in ["orders", "order details", "a]b", "  padded "] {
            let safe = safe_identifier(name, QuoteStyle::Brackets);
            assert_eq!(unsafe_identifier(&safe, QuoteStyle::Brackets), name.trim());
        }
        let safe = safe_identifier("a\"b c", QuoteStyle::DoubleQuotes);
        assert_eq!(unsafe_identifier(&safe, QuoteStyle::DoubleQuotes), "a\"b c");
    }

    #[test]
    fn test_literal_escapes_quotes() {
        assert_eq!(literal("[o'brien]", QuoteStyle::Brackets), "o''brien");
        assert_eq!(literal("users", QuoteStyle::Brackets), "users");
    }

    #[test]
    fn test_split_scope() {
        assert_eq!(split_scope("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_scope("single"), vec!["single"]);
        assert!(is_multi_scope("a,b"));
        assert!(!is_multi_scope("a"));
    }
}
