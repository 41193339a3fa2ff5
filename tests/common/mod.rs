//! In-memory catalog used by the pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;

use schema_dump::catalog::{CatalogRow, CatalogSource, Grammar};
use schema_dump::error::{DumpError, DumpResult};
use serde_json::Value;

/// Grammar whose "SQL" is just a lookup key.
pub struct FixtureGrammar;

impl Grammar for FixtureGrammar {
    fn list_tables(&self) -> String {
        "tables".to_string()
    }

    fn list_columns(&self, table: &str) -> String {
        format!("columns:{}", table)
    }

    fn list_indexes(&self, table: &str) -> String {
        format!("indexes:{}", table)
    }

    fn list_foreign_keys(&self, table: &str) -> String {
        format!("foreign_keys:{}", table)
    }
}

/// Answers queries from canned rows and records every query it sees.
#[derive(Default)]
pub struct FixtureCatalog {
    responses: HashMap<String, Vec<CatalogRow>>,
    pub queries: Vec<String>,
    fail_on: Option<String>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, key: &str, rows: Vec<CatalogRow>) -> Self {
        self.responses.insert(key.to_string(), rows);
        self
    }

    pub fn tables(self, names: &[&str]) -> Self {
        let rows = names
            .iter()
            .map(|n| CatalogRow::new().with("table_name", *n))
            .collect();
        self.respond("tables", rows)
    }

    /// Make one query fail with a database error.
    pub fn fail_on(mut self, key: &str) -> Self {
        self.fail_on = Some(key.to_string());
        self
    }
}

impl CatalogSource for FixtureCatalog {
    async fn select(&mut self, sql: &str) -> DumpResult<Vec<CatalogRow>> {
        self.queries.push(sql.to_string());
        if self.fail_on.as_deref() == Some(sql) {
            return Err(DumpError::Database(format!("query failed: {}", sql)));
        }
        Ok(self.responses.get(sql).cloned().unwrap_or_default())
    }
}

/// MySQL column row, read by name.
pub fn mysql_column(
    name: &str,
    ttype: &str,
    precision: Option<i64>,
    nullable: &str,
    default: Option<&str>,
    extra: &str,
) -> CatalogRow {
    CatalogRow::new()
        .with("name", name)
        .with("ttype", ttype)
        .with("precision", precision.map(Value::from).unwrap_or(Value::Null))
        .with("unsigned", Value::Null)
        .with("nullable", nullable)
        .with("default", default.map(Value::from).unwrap_or(Value::Null))
        .with("extra", extra)
}

/// `SHOW INDEX` row.
pub fn mysql_index(key: &str, column: &str, non_unique: i64) -> CatalogRow {
    CatalogRow::new()
        .with("Table", "t")
        .with("Non_unique", non_unique)
        .with("Key_name", key)
        .with("Column_name", column)
}

pub fn mysql_foreign_key(column: &str, ref_key: &str, to_table: &str, action: &str) -> CatalogRow {
    CatalogRow::new()
        .with("name", format!("fk_{}", column))
        .with("column", column)
        .with("ref_key", ref_key)
        .with("to_table", to_table)
        .with("on_update", action)
        .with("on_delete", action)
}

/// PostgreSQL column tuple.
pub fn pg_column(name: &str, ttype: &str, nullable: &str, default: Option<&str>) -> CatalogRow {
    CatalogRow::new()
        .with("name", name)
        .with("ttype", ttype)
        .with("precision", Value::Null)
        .with("nullable", nullable)
        .with("default", default.map(Value::from).unwrap_or(Value::Null))
}

/// PostgreSQL index tuple.
pub fn pg_index(name: &str, columns: &str, code: &str) -> CatalogRow {
    CatalogRow::new()
        .with("name", name)
        .with("columns", columns)
        .with("code", code)
}

/// PostgreSQL foreign key tuple.
pub fn pg_foreign_key(
    to_table: &str,
    column: &str,
    ref_key: &str,
    on_update: &str,
    on_delete: &str,
) -> CatalogRow {
    CatalogRow::new()
        .with("to_table", to_table)
        .with("column", column)
        .with("ref_key", ref_key)
        .with("name", format!("{}_fkey", column))
        .with("on_update", on_update)
        .with("on_delete", on_delete)
}
