//! dbcall Command-Line Tool
//!
//! Inspects routine catalogs and shows the backend command a call would
//! produce, without connecting to a database.

mod commands;
mod formatter;
mod literal;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use std::path::PathBuf;

/// dbcall Command-Line Tool
#[derive(Parser, Debug)]
#[command(name = "dbcall")]
#[command(version, about = "Inspect routine catalogs and plan routine calls")]
pub struct Args {
    /// Routine catalog (TOML)
    #[arg(short, long, env = "DBCALL_CATALOG")]
    pub catalog: PathBuf,

    /// Invoker configuration (TOML)
    #[arg(long, env = "DBCALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the call identifiers in the catalog
    Routines,
    /// Show a routine's parameters and their resolved directions
    Describe {
        /// Call identifier
        call_id: String,
    },
    /// Build the command for a call without executing it
    Plan {
        /// Call identifier
        call_id: String,
        /// Input values (null, true/false, integers, floats, or text)
        args: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = commands::run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
