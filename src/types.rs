//! Schema builder column types and the native type tables that map onto them.
//!
//! Each dialect has one fixed table keyed by the upper-cased native type
//! spelling its catalog reports. A native type missing from the table is an
//! error; there is no fallback type.

use std::fmt;

use crate::dialect::Dialect;
use crate::error::{DumpError, DumpResult};

/// Column constructors of the schema builder DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    BigIncrements,
    BigInteger,
    Binary,
    Boolean,
    Char,
    Date,
    DateTime,
    Decimal,
    Double,
    Enum,
    Float,
    Increments,
    Integer,
    Json,
    LongText,
    MediumInt,
    MediumText,
    SmallInt,
    String,
    Text,
    Time,
    Timestamp,
    TinyInt,
}

impl ColumnType {
    /// Name of the builder method, e.g. `big_integer`.
    pub fn builder_name(&self) -> &'static str {
        match self {
            Self::BigIncrements => "big_increments",
            Self::BigInteger => "big_integer",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::Increments => "increments",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::LongText => "long_text",
            Self::MediumInt => "medium_int",
            Self::MediumText => "medium_text",
            Self::SmallInt => "small_int",
            Self::String => "string",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TinyInt => "tiny_int",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.builder_name())
    }
}

/// MySQL `data_type` spellings.
pub const MYSQL_TYPES: &[(&str, ColumnType)] = &[
    ("BIGINT", ColumnType::BigInteger),
    ("BLOB", ColumnType::Binary),
    ("BOOLEAN", ColumnType::Boolean),
    ("CHAR", ColumnType::Char),
    ("DATE", ColumnType::Date),
    ("DATETIME", ColumnType::DateTime),
    ("DECIMAL", ColumnType::Decimal),
    ("DOUBLE", ColumnType::Double),
    ("ENUM", ColumnType::Enum),
    ("FLOAT", ColumnType::Float),
    ("INT", ColumnType::Integer),
    ("JSON", ColumnType::Json),
    ("LONGTEXT", ColumnType::LongText),
    ("MEDIUMINT", ColumnType::MediumInt),
    ("MEDIUMTEXT", ColumnType::MediumText),
    ("SMALLINT", ColumnType::SmallInt),
    ("TEXT", ColumnType::Text),
    ("TIME", ColumnType::Time),
    ("TINYINT", ColumnType::TinyInt),
    ("TIMESTAMP", ColumnType::Timestamp),
    ("VARCHAR", ColumnType::String),
];

/// PostgreSQL `data_type` spellings. Serial types map straight to the
/// increment constructors.
pub const POSTGRES_TYPES: &[(&str, ColumnType)] = &[
    ("BIGINT", ColumnType::BigInteger),
    ("BLOB", ColumnType::Binary),
    ("BOOLEAN", ColumnType::Boolean),
    ("CHAR", ColumnType::Char),
    ("DATE", ColumnType::Date),
    ("DATETIME", ColumnType::DateTime),
    ("DECIMAL", ColumnType::Decimal),
    ("DOUBLE", ColumnType::Double),
    ("ENUM", ColumnType::Enum),
    ("FLOAT", ColumnType::Float),
    ("INTEGER", ColumnType::Integer),
    ("JSON", ColumnType::Json),
    ("LONGTEXT", ColumnType::LongText),
    ("MEDIUMINT", ColumnType::MediumInt),
    ("MEDIUMTEXT", ColumnType::MediumText),
    ("SMALLINT", ColumnType::SmallInt),
    ("TEXT", ColumnType::Text),
    ("TIME", ColumnType::Time),
    ("TINYINT", ColumnType::TinyInt),
    ("TIMESTAMP WITHOUT TIME ZONE", ColumnType::Timestamp),
    ("CHARACTER VARYING", ColumnType::String),
    ("BIGSERIAL", ColumnType::BigIncrements),
    ("SERIAL", ColumnType::Increments),
    // information_schema spellings of common built-in types
    ("BYTEA", ColumnType::Binary),
    ("CHARACTER", ColumnType::Char),
    ("DOUBLE PRECISION", ColumnType::Double),
    ("JSONB", ColumnType::Json),
    ("NUMERIC", ColumnType::Decimal),
    ("REAL", ColumnType::Float),
    ("TIME WITHOUT TIME ZONE", ColumnType::Time),
];

/// The native type table of a dialect.
pub fn type_table(dialect: Dialect) -> &'static [(&'static str, ColumnType)] {
    match dialect {
        Dialect::MySql => MYSQL_TYPES,
        Dialect::Postgres => POSTGRES_TYPES,
    }
}

/// Look up a native type spelling, case-insensitively.
pub fn lookup(dialect: Dialect, native: &str) -> DumpResult<ColumnType> {
    let key = native.to_uppercase();
    type_table(dialect)
        .iter()
        .find(|(spelling, _)| *spelling == key)
        .map(|(_, column_type)| *column_type)
        .ok_or_else(|| DumpError::unmapped(dialect, native))
}
