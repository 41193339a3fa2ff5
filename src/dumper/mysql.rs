//! MySQL dumper.
//!
//! Catalog rows are read by column name. Output is a list of statements per
//! table; assembling a document is left to the caller.

use indexmap::IndexMap;

use super::{DumpOptions, Dumper, IndexRecord, TableDump, fetch, table_names};
use crate::catalog::{CatalogRow, CatalogSource, Grammar, MySqlGrammar};
use crate::dialect::Dialect;
use crate::error::DumpResult;
use crate::statement::{ColumnStatement, ForeignKeyStatement, IndexKind};
use crate::types::{self, ColumnType};

/// `extra` value marking an auto-increment column.
pub const AUTO_INCREMENT: &str = "auto_increment";

/// `unsigned` value marking an unsigned numeric column.
pub const UNSIGNED: &str = "unsigned";

/// Index name MySQL gives every primary key.
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// Default prefix of timestamp columns that default to the current time.
pub const CURRENT_TIMESTAMP: &str = "CURRENT_TIMESTAMP";

/// The only referential action passed through to the output.
pub const ACTION_SENTINEL: &str = "CASCADEA";

/// A column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
    pub name: String,
    pub ttype: String,
    /// Character length or display width.
    pub precision: Option<i64>,
    pub unsigned: Option<String>,
    /// `"NO"` for `NOT NULL` columns.
    pub nullable: String,
    pub default: Option<String>,
    pub extra: String,
}

impl ColumnRecord {
    pub fn from_row(row: &CatalogRow) -> DumpResult<Self> {
        Ok(Self {
            name: row.text("name")?,
            ttype: row.text("ttype")?,
            precision: row.optional_integer("precision")?,
            unsigned: row.optional_text("unsigned")?,
            nullable: row.optional_text("nullable")?.unwrap_or_default(),
            default: row.optional_text("default")?,
            extra: row.optional_text("extra")?.unwrap_or_default(),
        })
    }

    /// Builder type after the auto-increment and `tinyint(1)` rewrites.
    pub fn column_type(&self) -> DumpResult<ColumnType> {
        let mut ttype = types::lookup(Dialect::MySql, &self.ttype)?;

        if self.extra == AUTO_INCREMENT {
            ttype = match ttype {
                ColumnType::BigInteger => ColumnType::BigIncrements,
                ColumnType::Integer => ColumnType::Increments,
                other => other,
            };
        }

        if ttype == ColumnType::TinyInt && self.precision == Some(1) {
            ttype = ColumnType::Boolean;
        }

        Ok(ttype)
    }

    pub fn statement(&self, receiver: &str) -> DumpResult<String> {
        let ttype = self.column_type()?;
        let default = self
            .default
            .as_deref()
            .filter(|default| keeps_default(ttype, default));

        Ok(ColumnStatement::new(receiver, ttype, &self.name)
            .unsigned(self.unsigned.as_deref() == Some(UNSIGNED))
            .nullable(self.nullable != "NO")
            .default(default)
            .build())
    }
}

/// Timestamps defaulting to `CURRENT_TIMESTAMP...` lose their default.
pub fn keeps_default(ttype: ColumnType, default: &str) -> bool {
    !(ttype == ColumnType::Timestamp && default.starts_with(CURRENT_TIMESTAMP))
}

/// Group `SHOW INDEX` rows by `Key_name`, in first-seen order.
///
/// An index is marked unique when any of its rows has a truthy
/// `Non_unique`. That reads inverted against the column's meaning but is
/// the established output of this dumper: plain indexes come out as
/// `unique` and unique ones as `index`. `PRIMARY` is always `primary`.
pub fn aggregate_indexes(rows: &[CatalogRow]) -> DumpResult<Vec<IndexRecord>> {
    let mut grouped: IndexMap<String, (Vec<String>, bool)> = IndexMap::new();

    for row in rows {
        let name = row.text("Key_name")?;
        let column = row.text("Column_name")?;
        let non_unique = row.flag("Non_unique")?;

        let (columns, is_unique) = grouped.entry(name).or_default();
        columns.push(column);
        if non_unique {
            *is_unique = true;
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(name, (columns, is_unique))| {
            let kind = if name == PRIMARY_KEY_NAME {
                IndexKind::Primary
            } else if is_unique {
                IndexKind::Unique
            } else {
                IndexKind::Index
            };
            IndexRecord {
                name,
                columns,
                kind,
            }
        })
        .collect())
}

/// A foreign key as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRecord {
    pub column: String,
    pub ref_key: String,
    pub to_table: String,
    pub on_update: String,
    pub on_delete: String,
}

impl ForeignKeyRecord {
    pub fn from_row(row: &CatalogRow) -> DumpResult<Self> {
        Ok(Self {
            column: row.text("column")?,
            ref_key: row.text("ref_key")?,
            to_table: row.text("to_table")?,
            on_update: row.text("on_update")?,
            on_delete: row.text("on_delete")?,
        })
    }

    /// Actions other than the sentinel are left to the builder default.
    pub fn statement(&self, receiver: &str) -> String {
        ForeignKeyStatement::new(receiver, &self.column, &self.ref_key, &self.to_table)
            .on_update(passthrough_action(&self.on_update))
            .on_delete(passthrough_action(&self.on_delete))
            .build()
    }
}

fn passthrough_action(action: &str) -> Option<&'static str> {
    action
        .eq_ignore_ascii_case(ACTION_SENTINEL)
        .then_some(ACTION_SENTINEL)
}

/// Dumps a MySQL database.
pub struct MySqlDumper<C, G = MySqlGrammar> {
    conn: C,
    grammar: G,
    options: DumpOptions,
}

impl<C: CatalogSource> MySqlDumper<C> {
    pub fn new(conn: C) -> Self {
        Self::with_grammar(conn, MySqlGrammar::new())
    }
}

impl<C: CatalogSource, G: Grammar> MySqlDumper<C, G> {
    pub fn with_grammar(conn: C, grammar: G) -> Self {
        Self {
            conn,
            grammar,
            options: DumpOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DumpOptions) -> Self {
        self.options = options;
        self
    }

    pub fn into_inner(self) -> C {
        self.conn
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

impl<C: CatalogSource, G: Grammar> Dumper for MySqlDumper<C, G> {
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
