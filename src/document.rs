//! Migration document assembly.
//!
//! Wraps each table's statements in a `create` block and all blocks in one
//! migration class whose `down` drops the tables in the same order.

use std::fmt::{Result, Write};

use crate::dumper::TableDump;
use crate::literal;

/// Default migration class name.
pub const DEFAULT_CLASS_NAME: &str = "InitDb";

const IMPORT: &str = "from orator.migrations import Migration";

/// Renders [`TableDump`]s as one migration module.
#[derive(Debug, Clone)]
pub struct MigrationDocument {
    class_name: String,
}

impl Default for MigrationDocument {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_NAME)
    }
}

impl MigrationDocument {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn render(&self, tables: &[TableDump]) -> std::result::Result<String, std::fmt::Error> {
        let mut w = Writer::new();

        w.line(IMPORT)?;
        w.blank()?;
        w.blank()?;
        w.line(&format!("class {}(Migration):", self.class_name))?;

        w.indented(|w| {
            w.line("def up(self):")?;
            w.indented(|w| {
                for (i, table) in tables.iter().enumerate() {
                    if i > 0 {
                        w.blank()?;
                    }
                    create_block(w, table)?;
                }
                Ok(())
            })?;

            w.blank()?;
            w.line("def down(self):")?;
            w.indented(|w| {
                for table in tables {
                    w.line(&format!("self.schema.drop({})", literal::string(&table.name)))?;
                }
                Ok(())
            })
        })?;

        Ok(w.finish())
    }
}

/// `with self.schema.create('t') as table:` followed by the statements.
fn create_block(w: &mut Writer, table: &TableDump) -> Result {
    w.line(&format!(
        "with self.schema.create({}) as table:",
        literal::string(&table.name)
    ))?;
    w.indented(|w| {
        for stmt in &table.statements {
            w.line(stmt)?;
        }
        Ok(())
    })
}

/// Line writer with four-space indentation.
struct Writer {
    indent_level: usize,
    buffer: String,
}

impl Writer {
    fn new() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    fn line(&mut self, text: &str) -> Result {
        for _ in 0..self.indent_level {
            write!(self.buffer, "    ")?;
        }
        writeln!(self.buffer, "{}", text)
    }

    fn blank(&mut self) -> Result {
        writeln!(self.buffer)
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self) -> Result) -> Result {
        self.indent_level += 1;
        let result = body(self);
        self.indent_level -= 1;
        result
    }

    fn finish(self) -> String {
        self.buffer
    }
}
