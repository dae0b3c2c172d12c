//! `--check`: parse and resolve a configuration without serving it.
//!
//! Reports the routing table in either human-readable text or
//! machine-readable JSON format. Resolution runs every factory, so bad
//! settings are caught here too.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::cli::{CheckFormat, Cli};
use crate::config::{self, model::total_steps, RoutingTable, Step};
use crate::error::HttpDebugError;
use crate::pipeline::build_service;
use crate::{handler, middleware};

pub fn execute(cli: &Cli) -> Result<(), HttpDebugError> {
    let result = config::parse_args(&cli.config)
        .map_err(HttpDebugError::from)
        .and_then(|table| {
            build_service(&table, &middleware::registry(), &handler::registry())?;
            Ok(table)
        });

    let table = match result {
        Ok(table) => table,
        Err(e) => {
            match cli.format {
                CheckFormat::Text => eprintln!("\u{2717} {e}"),
                CheckFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "valid": false, "error": e.to_string() })
                ),
            }
            return Err(e);
        }
    };

    match cli.format {
        CheckFormat::Text => print!("\u{2713} {}", format_report(&table)),
        CheckFormat::Json => println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "paths": table,
                "steps": total_steps(&table),
            })
        ),
    }
    Ok(())
}

/// One line per path, steps in execution order.
#[must_use]
pub fn format_report(table: &RoutingTable) -> String {
    let mut out = format!(
        "configuration is valid: {} path(s), {} step(s)\n",
        table.len().max(1),
        total_steps(table)
    );
    if table.is_empty() {
        out.push_str("  / (default) log -> static\n");
        return out;
    }
    for (path, steps) in table {
        let steps = if steps.is_empty() {
            "(default) log -> static".to_string()
        } else {
            steps.iter().map(format_step).collect::<Vec<_>>().join(" -> ")
        };
        let _ = writeln!(out, "  {path} {steps}");
    }
    out
}

fn format_step(step: &Step) -> String {
    let Some(settings) = &step.settings else {
        return step.name.clone();
    };
    let sorted: BTreeMap<_, _> = settings.iter().collect();
    let pairs = sorted
        .iter()
        .map(|(k, v)| format!("{k}: {v:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}{{{pairs}}}", step.name)
}
