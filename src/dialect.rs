use std::fmt;

use crate::error::{DumpError, DumpResult};

/// Supported catalog dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Postgres,
}

impl Dialect {
    /// Pick the dialect from a connection URL scheme.
    ///
    /// ```
    /// use schema_dump::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("mysql://root@localhost/app").unwrap(), Dialect::MySql);
    /// assert_eq!(Dialect::from_url("postgres://localhost/app").unwrap(), Dialect::Postgres);
    /// ```
    pub fn from_url(url: &str) -> DumpResult<Self> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| DumpError::Config(format!("Not a database URL: '{}'", url)))?;

        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(DumpError::Config(format!(
                "Unsupported database scheme: '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
