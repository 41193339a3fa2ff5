//! Statement synthesis.
//!
//! Turns mapped records into single lines of schema builder calls, e.g.
//! `self.string('email').nullable()`. Everything here is plain string
//! building and cannot fail.

use std::fmt;

use crate::literal;
use crate::types::ColumnType;

/// Receiver of the generated builder calls.
pub const DEFAULT_RECEIVER: &str = "self";

/// Kind of an index statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Index,
    Unique,
    Primary,
}

impl IndexKind {
    pub fn builder_name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Unique => "unique",
            Self::Primary => "primary",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.builder_name())
    }
}

/// Builder for a column statement.
///
/// Qualifiers are always emitted in the order unsigned, nullable, default,
/// whatever order they were set in.
#[derive(Debug, Clone)]
pub struct ColumnStatement<'a> {
    receiver: &'a str,
    column_type: ColumnType,
    name: &'a str,
    unsigned: bool,
    nullable: bool,
    default: Option<&'a str>,
}

impl<'a> ColumnStatement<'a> {
    pub fn new(receiver: &'a str, column_type: ColumnType, name: &'a str) -> Self {
        Self {
            receiver,
            column_type,
            name,
            unsigned: false,
            nullable: false,
            default: None,
        }
    }

    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Default expression, emitted verbatim.
    pub fn default(mut self, default: Option<&'a str>) -> Self {
        self.default = default;
        self
    }

    pub fn build(&self) -> String {
        let mut stmt = format!(
            "{}.{}({})",
            self.receiver,
            self.column_type.builder_name(),
            literal::string(self.name)
        );
        if self.unsigned {
            stmt.push_str(".unsigned()");
        }
        if self.nullable {
            stmt.push_str(".nullable()");
        }
        if let Some(default) = self.default {
            stmt.push_str(&format!(".default({})", default));
        }
        stmt
    }
}

/// Index statement; primary keys never carry a name.
pub fn index(receiver: &str, kind: IndexKind, columns: &[String], name: &str) -> String {
    let name = (kind != IndexKind::Primary).then_some(name);
    format!(
        "{}.{}({}, name={})",
        receiver,
        kind.builder_name(),
        literal::list(columns),
        literal::optional(name)
    )
}

/// Builder for a `foreign → references → on` chain.
#[derive(Debug, Clone)]
pub struct ForeignKeyStatement<'a> {
    receiver: &'a str,
    column: &'a str,
    ref_key: &'a str,
    to_table: &'a str,
    on_update: Option<&'a str>,
    on_delete: Option<&'a str>,
}

impl<'a> ForeignKeyStatement<'a> {
    pub fn new(receiver: &'a str, column: &'a str, ref_key: &'a str, to_table: &'a str) -> Self {
        Self {
            receiver,
            column,
            ref_key,
            to_table,
            on_update: None,
            on_delete: None,
        }
    }

    pub fn on_update(mut self, action: Option<&'a str>) -> Self {
        self.on_update = action;
        self
    }

    pub fn on_delete(mut self, action: Option<&'a str>) -> Self {
        self.on_delete = action;
        self
    }

    pub fn build(&self) -> String {
        let mut stmt = format!(
            "{}.foreign({}).references({}).on({})",
            self.receiver,
            literal::string(self.column),
            literal::string(self.ref_key),
            literal::string(self.to_table)
        );
        if let Some(action) = self.on_update {
            stmt.push_str(&format!(".on_update({})", literal::string(action)));
        }
        if let Some(action) = self.on_delete {
            stmt.push_str(&format!(".on_delete({})", literal::string(action)));
        }
        stmt
    }
}
