//! schema-dump: dump a live database schema as Orator migration source.
//!
//! # Usage
//!
//! ```bash
//! # Full migration document on stdout
//! schema-dump --database-url postgres://localhost/app
//!
//! # Write to a file, skipping a table
//! schema-dump --database-url mysql://root@localhost/app --ignore sessions -o init_db.py
//!
//! # Per-table statements only
//! schema-dump --fragments
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use schema_dump::catalog::grammar::DEFAULT_SCHEMA;
use schema_dump::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-dump")]
#[command(version)]
#[command(about = "Dump a live MySQL or PostgreSQL schema as an Orator migration", long_about = None)]
#[command(after_help = "EXAMPLES:
    schema-dump --database-url postgres://localhost/app -o migrations/init_db.py
    schema-dump --database-url mysql://root@localhost/app --fragments
    schema-dump --config ./schema-dump.toml --table users --table posts")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "SCHEMA_DUMP_DATABASE_URL")]
    database_url: Option<String>,

    /// Config file (defaults to ./schema-dump.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PostgreSQL schema to dump
    #[arg(long)]
    schema: Option<String>,

    /// Extra table to skip (repeatable)
    #[arg(long)]
    ignore: Vec<String>,

    /// Only dump this table (repeatable)
    #[arg(short, long)]
    table: Vec<String>,

    /// Print per-table statements instead of a migration document
    #[arg(long)]
    fragments: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    apply_flags(&mut config, cli);

    let url = config.database_url.clone().ok_or_else(|| {
        anyhow!("No database URL. Use --database-url, set SCHEMA_DUMP_DATABASE_URL or add database_url to schema-dump.toml")
    })?;
    let dialect = Dialect::from_url(&url)?;

    if cli.verbose {
        eprintln!("{} {} ({})", "Connecting to:".dimmed(), url.yellow(), dialect);
    }
    let conn = LiveConnection::connect(&url).await?;

    let options = config.dump_options();
    let (tables, conn) = match dialect {
        Dialect::MySql => {
            let mut dumper = MySqlDumper::new(conn).with_options(options);
            (dumper.dump_tables().await?, dumper.into_inner())
        }
        Dialect::Postgres => {
            let schema = config.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
            let mut dumper =
                PostgresDumper::with_grammar(conn, PostgresGrammar::new(schema)).with_options(options);
            (dumper.dump_tables().await?, dumper.into_inner())
        }
    };
    conn.close().await?;

    let text = if cli.fragments {
        render_fragments(&tables)
    } else {
        config.document().render(&tables)?
    };

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Dumped {} table(s) to {}",
                "✓".green(),
                tables.len().to_string().cyan(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}

/// Flags win over the config file.
fn apply_flags(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.database_url {
        config.database_url = Some(url.clone());
    }
    if let Some(schema) = &cli.schema {
        config.schema = Some(schema.clone());
    }
    if let Some(path) = &cli.output {
        config.output.path = Some(path.clone());
    }
    config.ignore.extend(cli.ignore.iter().cloned());
    if !cli.table.is_empty() {
        config.tables = cli.table.clone();
    }
}

fn render_fragments(tables: &[TableDump]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&format!("# {}\n", table.name));
        for stmt in &table.statements {
            out.push_str(stmt);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
