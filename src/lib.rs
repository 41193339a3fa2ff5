//! # schema-dump
//!
//! Reads the live schema of a MySQL or PostgreSQL database and writes it back
//! out as Orator schema builder source.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use schema_dump::prelude::*;
//!
//! let conn = LiveConnection::connect("postgres://localhost/app").await?;
//! let mut dumper = PostgresDumper::new(conn);
//! let migration = dumper.dump().await?;
//! std::fs::write("init_db.py", migration)?;
//! ```
//!
//! ## Pipeline
//!
//! | Stage        | Module                  |
//! |--------------|-------------------------|
//! | Catalog read | [`catalog`]             |
//! | Normalize    | [`dumper::mysql`], [`dumper::postgres`] |
//! | Type mapping | [`types`]               |
//! | Statements   | [`statement`]           |
//! | Document     | [`document`]            |

pub mod catalog;
pub mod config;
pub mod dialect;
pub mod document;
pub mod dumper;
pub mod error;
pub mod literal;
pub mod statement;
pub mod types;

pub use dialect::Dialect;

pub mod prelude {
    pub use crate::catalog::{
        CatalogRow, CatalogSource, Grammar, LiveConnection, MySqlGrammar, PostgresGrammar,
    };
    pub use crate::config::Config;
    pub use crate::dialect::Dialect;
    pub use crate::document::MigrationDocument;
    pub use crate::dumper::{DumpOptions, Dumper, MySqlDumper, PostgresDumper, TableDump};
    pub use crate::error::*;
    pub use crate::types::ColumnType;
}
