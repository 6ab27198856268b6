//! Output formatting

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dbcall_routines::{resolve_direction, PreparedCall, RoutineDescriptor};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables
    Table,
    /// JSON documents
    Json,
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn kind_label(routine: &RoutineDescriptor) -> &'static str {
    if routine.composable {
        "function"
    } else {
        "procedure"
    }
}

/// Format the routine list
pub fn format_routines(
    routines: &[(&str, &RoutineDescriptor)],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = routines
                .iter()
                .map(|(call_id, routine)| {
                    serde_json::json!({
                        "call_id": call_id,
                        "mapped_name": routine.mapped_name,
                        "kind": kind_label(routine),
                        "parameters": routine.parameters.len(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Call", "Mapped name", "Kind", "Parameters"]);
            for (call_id, routine) in routines {
                table.add_row(vec![
                    call_id.to_string(),
                    routine.mapped_name.clone(),
                    kind_label(routine).to_string(),
                    routine.parameters.len().to_string(),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

/// Format one routine's parameters with their resolved directions
pub fn format_description(
    routine: &RoutineDescriptor,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let parameters: Vec<serde_json::Value> = routine
                .parameters
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "bind_name": p.bind_name,
                        "declared_type": p.declared_type.to_string(),
                        "direction": resolve_direction(p),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "mapped_name": routine.mapped_name,
                "composable": routine.composable,
                "returns": routine.returns,
                "parameters": parameters,
            }))?)
        }
        OutputFormat::Table => {
            let mut table = new_table(&["#", "Name", "Bind name", "Type", "Direction"]);
            for (idx, p) in routine.parameters.iter().enumerate() {
                table.add_row(vec![
                    (idx + 1).to_string(),
                    p.name.clone(),
                    p.bind_name.clone().unwrap_or_default(),
                    p.declared_type.to_string(),
                    resolve_direction(p).to_string(),
                ]);
            }
            Ok(format!(
                "{} ({})\n{}",
                routine.mapped_name,
                kind_label(routine),
                table
            ))
        }
    }
}

/// Format a planned call
pub fn format_plan(prepared: &PreparedCall, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&prepared.command)?),
        OutputFormat::Table => {
            let mut table = new_table(&["Bind name", "Direction", "Value"]);
            for parameter in &prepared.command.parameters {
                let value = if parameter.direction.is_input() {
                    parameter.value.to_string()
                } else {
                    "(written by backend)".to_string()
                };
                table.add_row(vec![
                    parameter.bind_name.clone(),
                    parameter.direction.to_string(),
                    value,
                ]);
            }
            Ok(format!(
                "{}\nkind: {}\n{}",
                prepared.command.text,
                prepared.command.kind.as_str(),
                table
            ))
        }
    }
}
