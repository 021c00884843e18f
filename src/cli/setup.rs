use crate::cli::CliContext;
use crate::core::run_log;
use crate::util::{curl, toolforge};
use anyhow::{bail, Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Report missing configs without applying anything
    #[arg(long)]
    pub check_only: bool,
}

/// Ensure every account in the pool has its component configs applied.
///
/// Accounts that already have configs are left alone; missing ones get
/// `<base_url>/<account>.yaml` streamed into the platform CLI.
pub fn run(ctx: &CliContext, args: SetupArgs) -> Result<()> {
    let pool = ctx.load_pool()?;
    let accounts = pool.resolve_accounts()?;
    let base_url = match &pool.components.base_url {
        Some(url) => url.clone(),
        None => bail!("[components] base_url is not set in {}", ctx.paths.pool_toml.display()),
    };

    let result = apply(&accounts, &base_url, args.check_only);
    if !args.check_only {
        if let Err(e) = run_log::record_locked(&ctx.paths, "setup", accounts.len(), None, &result)
        {
            eprintln!("warning: run log failed: {}", e);
        }
    }
    result
}

fn apply(accounts: &[String], base_url: &str, check_only: bool) -> Result<()> {
    let mut missing = 0usize;
    for account in accounts {
        println!("Checking {}", account);
        if toolforge::has_component_configs(account)? {
            continue;
        }
        missing += 1;
        let url = curl::account_config_url(base_url, account);
        if check_only {
            println!("  missing; would apply {}", url);
            continue;
        }
        println!("  applying {}", url);
        let config = curl::fetch_to_temp(&url)
            .with_context(|| format!("fetch component config for {}", account))?;
        toolforge::components_config_create(account, config.path())?;
    }

    if check_only && missing > 0 {
        println!("{} account(s) missing component configs", missing);
    } else if missing == 0 {
        println!("All accounts already configured");
    }
    Ok(())
}
