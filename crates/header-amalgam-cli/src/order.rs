//! Inspection of the resolved unit order

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use header_amalgam_core::Amalgamator;
use serde::Serialize;

use crate::config::ToolConfig;

#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Directory containing the header units
    #[arg(long, default_value = "./include/CLArgs")]
    pub header_dir: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    /// Units in the order they are concatenated
    pub order: Vec<String>,
    pub external: Vec<String>,
    /// unit -> units it includes directly
    pub dependencies: BTreeMap<String, Vec<String>>,
}

pub fn run(args: &OrderArgs, config: &ToolConfig) -> Result<OrderReport> {
    let resolved = Amalgamator::new(config.amalgam.clone())?.resolve(&args.header_dir)?;

    let dependencies = resolved
        .order
        .iter()
        .map(|unit| {
            let targets = resolved
                .dependencies
                .dependencies_of(unit)
                .map(str::to_string)
                .collect();
            (unit.clone(), targets)
        })
        .collect();

    Ok(OrderReport {
        external: resolved.dependencies.external.iter().cloned().collect(),
        order: resolved.order,
        dependencies,
    })
}

pub fn render(report: &OrderReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)? + "\n");
    }

    let mut out = String::new();
    for (position, unit) in report.order.iter().enumerate() {
        let deps = &report.dependencies[unit];
        if deps.is_empty() {
            writeln!(out, "{:>3}. {}", position + 1, unit)?;
        } else {
            writeln!(out, "{:>3}. {} <- {}", position + 1, unit, deps.join(", "))?;
        }
    }
    if !report.external.is_empty() {
        writeln!(out, "External includes:")?;
        for name in &report.external {
            writeln!(out, "  <{}>", name)?;
        }
    }
    Ok(out)
}
