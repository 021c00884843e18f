use crate::cli::CliContext;
use crate::core::run_log;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Show only the most recent N entries
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub fn run(ctx: &CliContext, args: LogArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let entries = run_log::read(&ctx.paths, args.limit)?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&entries).context("serialize run log")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No runs recorded");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Time").add_attribute(Attribute::Bold),
        Cell::new("Action").add_attribute(Attribute::Bold),
        Cell::new("Actor").add_attribute(Attribute::Bold),
        Cell::new("Accounts").add_attribute(Attribute::Bold),
        Cell::new("Destination").add_attribute(Attribute::Bold),
        Cell::new("Result").add_attribute(Attribute::Bold),
    ]);

    for entry in entries {
        let local: DateTime<Local> = entry.timestamp.into();
        let result = if entry.success {
            "ok".to_string()
        } else {
            entry.error.unwrap_or_else(|| "failed".to_string())
        };
        table.add_row(vec![
            local.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.action,
            entry.actor,
            entry.accounts.to_string(),
            entry.destination.unwrap_or_else(|| "-".to_string()),
            result,
        ]);
    }

    println!("{}", table);
    Ok(())
}
