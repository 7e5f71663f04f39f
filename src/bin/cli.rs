//! tinycol CLI
//!
//! Command-line interface for inspecting and querying table snapshots.

use std::num::{ParseFloatError, ParseIntError};
use std::path::{Path, PathBuf};
use std::str::ParseBoolError;

use clap::{Parser, Subcommand};
use tinycol::{ColumnSpec, ColumnType, Config, Handle, Op, Result, Table, TableError, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// tinycol CLI
#[derive(Parser, Debug)]
#[command(name = "tinycol")]
#[command(about = "Inspect and query tinycol table snapshots")]
#[command(version)]
struct Args {
    /// Rebuild the primary-key index and free list after loading
    #[arg(short, long)]
    reindex: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print table metadata and every live row
    Inspect {
        /// Snapshot file
        file: PathBuf,
    },

    /// Print rows matching `column op value`
    Select {
        /// Snapshot file
        file: PathBuf,

        /// Column to filter on
        column: String,

        /// Operator: eq, gt, lt, gte
        op: String,

        /// Value, parsed according to the column type
        value: String,
    },

    /// Delete rows where `column = value` and rewrite the snapshot
    Delete {
        /// Snapshot file
        file: PathBuf,

        /// Column to match
        column: String,

        /// Value, parsed according to the column type
        value: String,
    },

    /// Write a small example table
    Demo {
        /// Destination snapshot file
        file: PathBuf,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tinycol=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::builder().reindex_on_load(args.reindex).build();

    if let Err(e) = run(args.command, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Inspect { file } => inspect(&file, config),
        Commands::Select {
            file,
            column,
            op,
            value,
        } => select(&file, &column, op.parse()?, &value, config),
        Commands::Delete {
            file,
            column,
            value,
        } => delete(&file, &column, &value, config),
        Commands::Demo { file } => demo(&file),
    }
}

fn inspect(file: &Path, config: &Config) -> Result<()> {
    let table = tinycol::load_with_config(file, config)?;

    println!("table: {}", table.name());
    for column in table.columns() {
        println!("  column {} ({})", column.name(), column.column_type());
    }
    println!(
        "high-water mark: {}, live rows: {}",
        table.high_water_mark(),
        table.live_count()
    );
    for slot in table.live_slots() {
        println!("{}", table.row(slot));
    }
    Ok(())
}

fn select(file: &Path, column: &str, op: Op, raw: &str, config: &Config) -> Result<()> {
    let table = tinycol::load_with_config(file, config)?;
    let value = parse_value(&table, column, raw)?;

    let mut matches = 0;
    table.select_where_op(column, op, value, |t, slot| {
        println!("{}", t.row(slot));
        matches += 1;
    })?;
    tracing::info!("{} rows where {} {} {}", matches, column, op, raw);
    Ok(())
}

fn delete(file: &Path, column: &str, raw: &str, config: &Config) -> Result<()> {
    let mut table = tinycol::load_with_config(file, config)?;
    let value = parse_value(&table, column, raw)?;

    let deleted = table.delete_where_eq(column, value)?;
    tinycol::save(&table, file)?;
    tracing::info!("Deleted {} rows where {} = {}", deleted, column, raw);
    Ok(())
}

fn demo(file: &Path) -> Result<()> {
    let mut table = Table::new(
        "people",
        &[
            ColumnSpec::int("id"),
            ColumnSpec::text("name"),
            ColumnSpec::int("age"),
        ],
    )?;
    for (id, name, age) in [(1, "Alice", 30), (2, "Bob", 22), (3, "Cara", 22), (4, "Dave", 30)] {
        table.insert(&[Value::Int(id), Value::Text(name), Value::Int(age)])?;
    }
    tinycol::save(&table, file)?;
    tracing::info!("Wrote {} rows to {}", table.live_count(), file.display());
    Ok(())
}

/// Parse `raw` according to the type of `column`
fn parse_value<'a>(table: &Table, column: &str, raw: &'a str) -> Result<Value<'a>> {
    let index = table
        .column_index(column)
        .ok_or_else(|| TableError::NotFound(format!("column '{}'", column)))?;
    let column_type = table.columns()[index].column_type();
    let invalid = |e: String| {
        TableError::Invalid(format!("'{}' is not a valid {}: {}", raw, column_type, e))
    };

    Ok(match column_type {
        ColumnType::Int => Value::Int(raw.parse().map_err(|e: ParseIntError| invalid(e.to_string()))?),
        ColumnType::Text => Value::Text(raw),
        ColumnType::Bool => Value::Bool(raw.parse().map_err(|e: ParseBoolError| invalid(e.to_string()))?),
        ColumnType::Float => Value::Float(raw.parse().map_err(|e: ParseFloatError| invalid(e.to_string()))?),
        ColumnType::Double => Value::Double(raw.parse().map_err(|e: ParseFloatError| invalid(e.to_string()))?),
        ColumnType::Pointer => {
            let parsed = match raw.strip_prefix("0x") {
                Some(hex) => usize::from_str_radix(hex, 16),
                None => raw.parse(),
            };
            Value::Pointer(Handle(parsed.map_err(|e| invalid(e.to_string()))?))
        }
    })
}
