//! Schema dumpers.
//!
//! One [`Dumper`] implementation per dialect. Both follow the same pipeline:
//! catalog rows are normalized into records, column types are mapped, and
//! each record becomes one statement. A table's statements are always
//! columns, then indexes, then foreign keys.

pub mod mysql;
pub mod postgres;

use tracing::{debug, info};

use crate::catalog::{CatalogRow, CatalogSource};
use crate::error::DumpResult;
use crate::statement::{self, DEFAULT_RECEIVER, IndexKind};

pub use mysql::MySqlDumper;
pub use postgres::PostgresDumper;

/// Tables never dumped: migration bookkeeping.
pub const IGNORED_TABLES: &[&str] = &["migrations"];

/// Statements generated for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDump {
    pub name: String,
    pub statements: Vec<String>,
}

/// An index aggregated from one or more catalog rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub name: String,
    pub columns: Vec<String>,
    pub kind: IndexKind,
}

impl IndexRecord {
    pub fn statement(&self, receiver: &str) -> String {
        statement::index(receiver, self.kind, &self.columns, &self.name)
    }
}

/// Options shared by both dumpers.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Table names excluded from the listing, matched exactly.
    pub ignore: Vec<String>,
    /// When non-empty, only these tables are dumped.
    pub tables: Vec<String>,
    /// Receiver of the generated builder calls.
    pub receiver: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            ignore: IGNORED_TABLES.iter().map(|t| t.to_string()).collect(),
            tables: Vec::new(),
            receiver: DEFAULT_RECEIVER.to_string(),
        }
    }
}

impl DumpOptions {
    /// Add extra ignored tables on top of the built-in ones.
    pub fn ignore<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for table in tables {
            let table = table.into();
            if !self.ignore.contains(&table) {
                self.ignore.push(table);
            }
        }
        self
    }

    /// Restrict the dump to the given tables.
    pub fn only<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    pub fn is_ignored(&self, table: &str) -> bool {
        self.ignore.iter().any(|t| t == table)
    }

    /// Whether a listed table passes the table filter.
    pub fn is_selected(&self, table: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }
}

/// The operations every dialect dumper provides.
#[allow(async_fn_in_trait)]
pub trait Dumper {
    fn options(&self) -> &DumpOptions;

    /// All table names in listing order, minus ignored tables.
    async fn list_tables(&mut self) -> DumpResult<Vec<String>>;

    /// Statements for one table.
    async fn dump_table(&mut self, table: &str) -> DumpResult<TableDump>;

    /// Statements for every selected table, in listing order.
    async fn dump_tables(&mut self) -> DumpResult<Vec<TableDump>> {
        let tables = self.list_tables().await?;
        let mut dumps = Vec::with_capacity(tables.len());
        for table in tables {
            if !self.options().is_selected(&table) {
                continue;
            }
            let dump = self.dump_table(&table).await?;
            info!(table = %dump.name, statements = dump.statements.len(), "dumped table");
            dumps.push(dump);
        }
        Ok(dumps)
    }
}

/// Run one catalog query with logging.
pub(crate) async fn fetch<C: CatalogSource>(
    conn: &mut C,
    kind: &'static str,
    table: Option<&str>,
    sql: &str,
) -> DumpResult<Vec<CatalogRow>> {
    debug!(kind, table = table.unwrap_or(""), "querying catalog");
    let rows = conn.select(sql).await?;
    debug!(kind, rows = rows.len(), "catalog rows");
    Ok(rows)
}

/// Table names from a listing query's `table_name` column.
pub(crate) fn table_names(rows: &[CatalogRow], options: &DumpOptions) -> DumpResult<Vec<String>> {
    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        let name = row.text("table_name")?;
        if options.is_ignored(&name) {
            debug!(table = %name, "skipping ignored table");
            continue;
        }
        names.push(name);
    }
    Ok(names)
}
