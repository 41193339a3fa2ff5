//! Introspection SQL for each dialect.
//!
//! The row shapes here are what the dumpers expect: MySQL rows are read by
//! column name, PostgreSQL rows by position.

use super::Grammar;

/// Default PostgreSQL schema.
pub const DEFAULT_SCHEMA: &str = "public";

/// Escape a value for use inside a single-quoted SQL string literal.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a MySQL identifier with backticks.
fn quote_mysql_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// MySQL catalog queries, scoped to the connection's current database.
#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar;

impl MySqlGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Grammar for MySqlGrammar {
    fn list_tables(&self) -> String {
        "SELECT CAST(table_name AS CHAR) AS table_name \
         FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
         ORDER BY table_name"
            .to_string()
    }

    /// Columns: `name, ttype, precision, unsigned, nullable, default, extra`.
    ///
    /// `precision` is the character length for string types and the declared
    /// display width for integer types (`tinyint(1)` gives 1).
    fn list_columns(&self, table: &str) -> String {
        format!(
            r#"SELECT CAST(column_name AS CHAR) AS `name`,
       CAST(data_type AS CHAR) AS `ttype`,
       CAST(CASE
           WHEN character_maximum_length IS NOT NULL THEN character_maximum_length
           WHEN column_type REGEXP '^[a-z]*int\\([0-9]+\\)'
               THEN SUBSTRING_INDEX(SUBSTRING_INDEX(column_type, '(', -1), ')', 1)
           ELSE numeric_precision
       END AS SIGNED) AS `precision`,
       IF(column_type LIKE '%unsigned%', 'unsigned', NULL) AS `unsigned`,
       CAST(is_nullable AS CHAR) AS `nullable`,
       CAST(column_default AS CHAR) AS `default`,
       CAST(extra AS CHAR) AS `extra`
FROM information_schema.columns
WHERE table_schema = DATABASE() AND table_name = {}
ORDER BY ordinal_position"#,
            quote_literal(table)
        )
    }

    /// `SHOW INDEX` rows: one per column per index.
    fn list_indexes(&self, table: &str) -> String {
        format!("SHOW INDEX FROM {}", quote_mysql_identifier(table))
    }

    /// Foreign keys: `name, column, ref_key, to_table, on_update, on_delete`.
    fn list_foreign_keys(&self, table: &str) -> String {
        format!(
            r#"SELECT CAST(k.constraint_name AS CHAR) AS `name`,
       CAST(k.column_name AS CHAR) AS `column`,
       CAST(k.referenced_column_name AS CHAR) AS `ref_key`,
       CAST(k.referenced_table_name AS CHAR) AS `to_table`,
       CAST(r.update_rule AS CHAR) AS `on_update`,
       CAST(r.delete_rule AS CHAR) AS `on_delete`
FROM information_schema.key_column_usage k
JOIN information_schema.referential_constraints r
  ON r.constraint_schema = k.constraint_schema
 AND r.constraint_name = k.constraint_name
WHERE k.table_schema = DATABASE()
  AND k.table_name = {}
  AND k.referenced_table_name IS NOT NULL
ORDER BY k.constraint_name, k.ordinal_position"#,
            quote_literal(table)
        )
    }
}

/// PostgreSQL catalog queries for one schema.
#[derive(Debug, Clone)]
pub struct PostgresGrammar {
    schema: String,
}

impl Default for PostgresGrammar {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA)
    }
}

impl PostgresGrammar {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

impl Grammar for PostgresGrammar {
    fn list_tables(&self) -> String {
        format!(
            "SELECT table_name::text AS table_name \
             FROM information_schema.tables \
             WHERE table_schema = {} AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
            quote_literal(&self.schema)
        )
    }

    /// Positional `(name, ttype, precision, nullable, default)`.
    ///
    /// Integer columns fed by a sequence are reported as `serial`/`bigserial`.
    fn list_columns(&self, table: &str) -> String {
        format!(
            r#"SELECT c.column_name::text AS name,
       CASE
           WHEN c.data_type = 'integer' AND c.column_default LIKE 'nextval(%' THEN 'serial'
           WHEN c.data_type = 'bigint' AND c.column_default LIKE 'nextval(%' THEN 'bigserial'
           ELSE c.data_type::text
       END AS ttype,
       COALESCE(c.character_maximum_length, c.numeric_precision)::bigint AS precision,
       c.is_nullable::text AS nullable,
       c.column_default::text AS "default"
FROM information_schema.columns c
WHERE c.table_schema = {} AND c.table_name = {}
ORDER BY c.ordinal_position"#,
            quote_literal(&self.schema),
            quote_literal(table)
        )
    }

    /// Positional `(name, columns, code)`; `columns` is `", "`-joined and
    /// `code` is `p`, `u` or `i`.
    fn list_indexes(&self, table: &str) -> String {
        format!(
            r#"SELECT i.relname::text AS name,
       string_agg(a.attname::text, ', ' ORDER BY k.ordinality) AS columns,
       CASE WHEN ix.indisprimary THEN 'p' WHEN ix.indisunique THEN 'u' ELSE 'i' END AS code
FROM pg_index ix
JOIN pg_class t ON t.oid = ix.indrelid
JOIN pg_class i ON i.oid = ix.indexrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS k(attnum, ordinality) ON true
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
WHERE n.nspname = {} AND t.relname = {}
GROUP BY i.relname, ix.indisprimary, ix.indisunique
ORDER BY i.relname"#,
            quote_literal(&self.schema),
            quote_literal(table)
        )
    }

    /// Positional `(to_table, column, ref_key, name, on_update, on_delete)`
    /// with `pg_constraint` action codes. A composite key gives one row per
    /// column pair, in key order.
    fn list_foreign_keys(&self, table: &str) -> String {
        format!(
            r#"SELECT ft.relname::text AS to_table,
       a.attname::text AS "column",
       fa.attname::text AS ref_key,
       c.conname::text AS name,
       c.confupdtype::text AS on_update,
       c.confdeltype::text AS on_delete
FROM pg_constraint c
JOIN pg_class t ON t.oid = c.conrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
JOIN pg_class ft ON ft.oid = c.confrelid
JOIN LATERAL unnest(c.conkey, c.confkey) WITH ORDINALITY AS k(attnum, ref_attnum, ordinality) ON true
JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = k.attnum
JOIN pg_attribute fa ON fa.attrelid = c.confrelid AND fa.attnum = k.ref_attnum
WHERE c.contype = 'f' AND n.nspname = {} AND t.relname = {}
ORDER BY c.conname, k.ordinality"#,
            quote_literal(&self.schema),
            quote_literal(table)
        )
    }
}
