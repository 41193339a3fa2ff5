//! Configuration file support.
//!
//! ```toml
//! database_url = "postgres://localhost/app"
//! schema = "public"
//! ignore = ["sessions"]
//!
//! [output]
//! class_name = "InitDb"
//! path = "migrations/init_db.py"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::document::{DEFAULT_CLASS_NAME, MigrationDocument};
use crate::dumper::DumpOptions;
use crate::error::{DumpError, DumpResult};
use crate::statement::DEFAULT_RECEIVER;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "schema-dump.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database_url: Option<String>,
    /// PostgreSQL schema to dump.
    pub schema: Option<String>,
    /// Extra tables to skip.
    pub ignore: Vec<String>,
    /// Only dump these tables.
    pub tables: Vec<String>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub class_name: String,
    pub receiver: String,
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            receiver: DEFAULT_RECEIVER.to_string(),
            path: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> DumpResult<Self> {
        toml::from_str(content).map_err(|e| DumpError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> DumpResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DumpError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load an explicit file, or the first default location that exists.
    ///
    /// No config file at the default locations means defaults.
    pub fn load(explicit: Option<&Path>) -> DumpResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for path in Self::default_paths() {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// `./schema-dump.toml`, then `<config dir>/schema-dump/config.toml`.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("schema-dump").join("config.toml"));
        }
        paths
    }

    pub fn dump_options(&self) -> DumpOptions {
        DumpOptions::default()
            .ignore(self.ignore.iter().cloned())
            .only(self.tables.iter().cloned())
            .receiver(self.output.receiver.clone())
    }

    pub fn document(&self) -> MigrationDocument {
        MigrationDocument::new(self.output.class_name.clone())
    }
}
