//! Command implementations

use anyhow::Context;
use dbcall_core::{StandardConverter, Value};
use dbcall_routines::{InvokerConfig, RoutineCatalog, RoutineInvoker, StaticCatalog};
use std::path::Path;
use std::sync::Arc;

use crate::formatter::{format_description, format_plan, format_routines};
use crate::literal::parse_literal;
use crate::{Args, Command};

/// Run a parsed command line and print its output
pub fn run(args: Args) -> anyhow::Result<()> {
    let output = execute(&args)?;
    println!("{}", output);
    Ok(())
}

/// Run a parsed command line and return its output
pub fn execute(args: &Args) -> anyhow::Result<String> {
    let catalog = load_catalog(&args.catalog)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => InvokerConfig::default(),
    };
    tracing::debug!(routines = catalog.len(), "catalog loaded");

    match &args.command {
        Command::Routines => {
            let routines = catalog
                .call_ids()
                .into_iter()
                .filter_map(|id| catalog.resolve(id).map(|r| (id, r)))
                .collect::<Vec<_>>();
            let borrowed: Vec<_> = routines.iter().map(|(id, r)| (*id, r.as_ref())).collect();
            format_routines(&borrowed, args.format)
        }
        Command::Describe { call_id } => {
            let routine = catalog
                .resolve(call_id)
                .with_context(|| format!("no routine is mapped to call `{}`", call_id))?;
            format_description(&routine, args.format)
        }
        Command::Plan {
            call_id,
            args: raw_inputs,
        } => {
            let inputs: Vec<Value> = raw_inputs.iter().map(|a| parse_literal(a)).collect();
            let invoker = RoutineInvoker::new(
                Arc::new(catalog),
                Arc::new(StandardConverter),
                config,
            );
            let prepared = invoker
                .prepare(call_id, &inputs)
                .with_context(|| format!("failed to plan call `{}`", call_id))?;
            format_plan(&prepared, args.format)
        }
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<StaticCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    StaticCatalog::from_toml_str(&text)
        .with_context(|| format!("invalid catalog {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<InvokerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    InvokerConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}
