//! Catalog access: raw rows, the connection seam and the query grammar.
//!
//! Dumpers never talk to a driver directly. They ask a [`Grammar`] for the
//! introspection SQL and run it through a [`CatalogSource`], getting back
//! [`CatalogRow`]s in whatever shape the catalog produced.

pub mod grammar;
pub mod live;

use std::fmt;

use serde_json::Value;

use crate::error::{DumpError, DumpResult};

pub use grammar::{MySqlGrammar, PostgresGrammar};
pub use live::LiveConnection;

/// Something that can run a catalog query.
///
/// Errors are passed through untouched; implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn select(&mut self, sql: &str) -> DumpResult<Vec<CatalogRow>>;
}

impl<C: CatalogSource> CatalogSource for &mut C {
    async fn select(&mut self, sql: &str) -> DumpResult<Vec<CatalogRow>> {
        (**self).select(sql).await
    }
}

/// Supplies the four introspection queries of a dialect.
pub trait Grammar {
    fn list_tables(&self) -> String;
    fn list_columns(&self, table: &str) -> String;
    fn list_indexes(&self, table: &str) -> String;
    fn list_foreign_keys(&self, table: &str) -> String;
}

/// One catalog row, addressable by column name or by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

/// Ways to address a field of a [`CatalogRow`].
pub trait RowIndex: fmt::Display + Copy {
    fn position(self, row: &CatalogRow) -> Option<usize>;
}

impl RowIndex for &str {
    fn position(self, row: &CatalogRow) -> Option<usize> {
        row.columns.iter().position(|c| c == self)
    }
}

impl RowIndex for usize {
    fn position(self, row: &CatalogRow) -> Option<usize> {
        (self < row.values.len()).then_some(self)
    }
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a named field.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw value of a field; a missing field is a malformed row.
    pub fn value<I: RowIndex>(&self, index: I) -> DumpResult<&Value> {
        index
            .position(self)
            .map(|i| &self.values[i])
            .ok_or_else(|| DumpError::malformed(index, "is missing"))
    }

    /// A field that must hold text.
    pub fn text<I: RowIndex>(&self, index: I) -> DumpResult<String> {
        self.optional_text(index)?
            .ok_or_else(|| DumpError::malformed(index, "is null"))
    }

    /// A text field that may be null. Numbers and booleans are rendered.
    pub fn optional_text<I: RowIndex>(&self, index: I) -> DumpResult<Option<String>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(DumpError::malformed(
                index,
                format!("is not text: {}", other),
            )),
        }
    }

    /// An integer field that may be null. Numeric text is parsed.
    pub fn optional_integer<I: RowIndex>(&self, index: I) -> DumpResult<Option<i64>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| DumpError::malformed(index, format!("is not an integer: {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DumpError::malformed(index, format!("is not an integer: '{}'", s))),
            other => Err(DumpError::malformed(
                index,
                format!("is not an integer: {}", other),
            )),
        }
    }

    /// Truthiness of a flag field: true, non-zero numbers and non-empty
    /// strings are set; null, false, zero and empty strings are not.
    pub fn flag<I: RowIndex>(&self, index: I) -> DumpResult<bool> {
        Ok(match self.value(index)? {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CatalogRow {
        CatalogRow::new()
            .with("name", "id")
            .with("precision", 11)
            .with("default", Value::Null)
            .with("width", "1")
            .with("Non_unique", 0)
    }

    #[test]
    fn test_access_by_name_and_position() {
        let row = row();
        assert_eq!(row.text("name").unwrap(), "id");
        assert_eq!(row.text(0).unwrap(), "id");
        assert_eq!(row.optional_integer("precision").unwrap(), Some(11));
        assert_eq!(row.optional_integer(3).unwrap(), Some(1));
        assert_eq!(row.optional_text("default").unwrap(), None);
        assert_eq!(row.len(), 5);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let row = row();
        let err = row.text("extra").unwrap_err();
        assert!(matches!(err, DumpError::MalformedRow { ref field, .. } if field == "extra"));
        assert!(row.value(9).is_err());
    }

    #[test]
    fn test_null_required_text_is_malformed() {
        assert!(row().text("default").is_err());
    }

    #[test]
    fn test_flag_truthiness() {
        let row = CatalogRow::new()
            .with("zero", 0)
            .with("one", 1)
            .with("yes", true)
            .with("empty", "")
            .with("text", "0")
            .with("null", Value::Null);
        assert!(!row.flag("zero").unwrap());
        assert!(row.flag("one").unwrap());
        assert!(row.flag("yes").unwrap());
        assert!(!row.flag("empty").unwrap());
        assert!(row.flag("text").unwrap());
        assert!(!row.flag("null").unwrap());
    }
}
