use crate::cli::CliContext;
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Serialize)]
struct AccountItem {
    account: String,
    system_user: String,
}

pub fn run(ctx: &CliContext, args: AccountsArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let pool = ctx.load_pool()?;
    let accounts = pool.resolve_accounts()?;
    let items: Vec<AccountItem> = accounts
        .iter()
        .map(|a| AccountItem {
            account: a.clone(),
            system_user: format!("{}{}", crate::constants::TOOL_USER_PREFIX, a),
        })
        .collect();

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize accounts")?;
        println!("{}", json);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Account").add_attribute(Attribute::Bold),
        Cell::new("System user").add_attribute(Attribute::Bold),
    ]);
    for item in items {
        table.add_row(vec![item.account, item.system_user]);
    }
    println!("{}", table);
    println!(
        "{} accounts; destination {} on {}",
        accounts.len(),
        pool.secrets.destination,
        pool.pool.tool
    );
    Ok(())
}
