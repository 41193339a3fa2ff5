//! PostgreSQL dumper.
//!
//! Catalog rows are read by position. [`PostgresDumper::dump`] produces a
//! complete migration document.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::{DumpOptions, Dumper, IndexRecord, TableDump, fetch, table_names};
use crate::catalog::{CatalogRow, CatalogSource, Grammar, PostgresGrammar};
use crate::dialect::Dialect;
use crate::document::MigrationDocument;
use crate::error::DumpResult;
use crate::statement::{ColumnStatement, ForeignKeyStatement, IndexKind};
use crate::types::{self, ColumnType};

/// Marker for timestamp defaults that are suppressed.
pub const TIMESTAMP_MARKER: &str = "timestamp";

/// `pg_constraint` action code translated to `restrict`.
pub const NO_ACTION_CODE: &str = "a";

/// Defaults starting with two word characters look like expressions
/// (`nextval(...)`, `now()`, `true`) and are dropped. Numeric literals of
/// two or more digits are dropped with them.
static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w\w").expect("expression pattern is valid")
});

/// A column row: `(name, ttype, precision, nullable, default)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
    pub name: String,
    pub ttype: String,
    pub precision: Option<i64>,
    pub nullable: String,
    pub default: Option<String>,
}

impl ColumnRecord {
    pub fn from_row(row: &CatalogRow) -> DumpResult<Self> {
        Ok(Self {
            name: row.text(0)?,
            ttype: row.text(1)?,
            precision: row.optional_integer(2)?,
            nullable: row.optional_text(3)?.unwrap_or_default(),
            default: row.optional_text(4)?,
        })
    }

    pub fn column_type(&self) -> DumpResult<ColumnType> {
        types::lookup(Dialect::Postgres, &self.ttype)
    }

    pub fn statement(&self, receiver: &str) -> DumpResult<String> {
        let ttype = self.column_type()?;
        let default = self
            .default
            .as_deref()
            .filter(|default| keeps_default(ttype, default))
            .map(strip_cast);

        Ok(ColumnStatement::new(receiver, ttype, &self.name)
            .nullable(self.nullable != "NO")
            .default(default)
            .build())
    }
}

/// Whether a raw default survives into the output.
pub fn keeps_default(ttype: ColumnType, default: &str) -> bool {
    if ttype == ColumnType::Timestamp && default.contains(TIMESTAMP_MARKER) {
        return false;
    }
    !EXPRESSION.is_match(default)
}

/// Drop a trailing `::type` cast: `'draft'::character varying` → `'draft'`.
pub fn strip_cast(default: &str) -> &str {
    default.split(':').next().unwrap_or(default)
}

/// Group index rows `(name, columns, code)` by name, in first-seen order.
///
/// `columns` holds one or more `", "`-separated names. The code of the last
/// row wins: `u` is unique, `p` is primary, anything else keeps the kind.
pub fn aggregate_indexes(rows: &[CatalogRow]) -> DumpResult<Vec<IndexRecord>> {
    let mut grouped: IndexMap<String, (Vec<String>, IndexKind)> = IndexMap::new();

    for row in rows {
        let name = row.text(0)?;
        let columns = row.text(1)?;
        let code = row.optional_text(2)?.unwrap_or_default();

        let (names, kind) = grouped
            .entry(name)
            .or_insert_with(|| (Vec::new(), IndexKind::Index));
        names.extend(columns.split(", ").map(str::to_string));
        match code.as_str() {
            "u" => *kind = IndexKind::Unique,
            "p" => *kind = IndexKind::Primary,
            _ => {}
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(name, (columns, kind))| IndexRecord {
            name,
            columns,
            kind,
        })
        .collect())
}

/// A foreign key row: `(to_table, column, ref_key, name, on_update, on_delete)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRecord {
    pub to_table: String,
    pub column: String,
    pub ref_key: String,
    pub name: String,
    pub on_update: String,
    pub on_delete: String,
}

impl ForeignKeyRecord {
    pub fn from_row(row: &CatalogRow) -> DumpResult<Self> {
        Ok(Self {
            to_table: row.text(0)?,
            column: row.text(1)?,
            ref_key: row.text(2)?,
            name: row.text(3)?,
            on_update: row.text(4)?,
            on_delete: row.text(5)?,
        })
    }

    /// Both actions are always spelled out.
    pub fn statement(&self, receiver: &str) -> String {
        ForeignKeyStatement::new(receiver, &self.column, &self.ref_key, &self.to_table)
            .on_update(Some(action(&self.on_update)))
            .on_delete(Some(action(&self.on_delete)))
            .build()
    }
}

/// Translate a `pg_constraint` action code.
pub fn action(code: &str) -> &'static str {
    if code == NO_ACTION_CODE {
        "restrict"
    } else {
        "cascade"
    }
}

/// Dumps a PostgreSQL schema.
pub struct PostgresDumper<C, G = PostgresGrammar> {
    conn: C,
    grammar: G,
    options: DumpOptions,
    document: MigrationDocument,
}

impl<C: CatalogSource> PostgresDumper<C> {
    pub fn new(conn: C) -> Self {
        Self::with_grammar(conn, PostgresGrammar::default())
    }
}

impl<C: CatalogSource, G: Grammar> PostgresDumper<C, G> {
    pub fn with_grammar(conn: C, grammar: G) -> Self {
        Self {
            conn,
            grammar,
            options: DumpOptions::default(),
            document: MigrationDocument::default(),
        }
    }

    pub fn with_options(mut self, options: DumpOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_document(mut self, document: MigrationDocument) -> Self {
        self.document = document;
        self
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Dump every table into one migration document.
    pub async fn dump(&mut self) -> DumpResult<String> {
        let tables = self.dump_tables().await?;
        Ok(self.document.render(&tables)?)
    }

    pub async fn list_columns(&mut self, table: &str) -> DumpResult<Vec<ColumnRecord>> {
        let sql = self.grammar.list_columns(table);
        let rows = fetch(&mut self.conn, "columns", Some(table), &sql).await?;
        rows.iter().map(ColumnRecord::from_row).collect()
    }

    pub async fn list_indexes(&mut self, table: &str) -> DumpResult<Vec<IndexRecord>> {
        let sql = self.grammar.list_indexes(table);
        let rows = fetch(&mut self.conn, "indexes", Some(table), &sql).await?;
        aggregate_indexes(&rows)
    }

    pub async fn list_foreign_keys(&mut self, table: &str) -> DumpResult<Vec<ForeignKeyRecord>> {
        let sql = self.grammar.list_foreign_keys(table);
        let rows = fetch(&mut self.conn, "foreign_keys", Some(table), &sql).await?;
        rows.iter().map(ForeignKeyRecord::from_row).collect()
    }
}

impl<C: CatalogSource, G: Grammar> Dumper for PostgresDumper<C, G> {
    fn options(&self) -> &DumpOptions {
        &self.options
    }

    async fn list_tables(&mut self) -> DumpResult<Vec<String>> {
        let sql = self.grammar.list_tables();
        let rows = fetch(&mut self.conn, "tables", None, &sql).await?;
        table_names(&rows, &self.options)
    }

    async fn dump_table(&mut self, table: &str) -> DumpResult<TableDump> {
        let columns = self.list_columns(table).await?;
        let indexes = self.list_indexes(table).await?;
        let foreign_keys = self.list_foreign_keys(table).await?;

        let receiver = self.options.receiver.as_str();
        let mut statements = Vec::with_capacity(columns.len() + indexes.len() + foreign_keys.len());
        for column in &columns {
            statements.push(column.statement(receiver)?);
        }
        statements.extend(indexes.iter().map(|i| i.statement(receiver)));
        statements.extend(foreign_keys.iter().map(|fk| fk.statement(receiver)));

        Ok(TableDump {
            name: table.to_string(),
            statements,
        })
    }
}
