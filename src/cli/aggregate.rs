use crate::cli::CliContext;
use crate::core::aggregator;
use crate::core::file_lock::RunLock;
use crate::core::run_log;
use crate::core::store::{SecretStore, ToolforgeStore};
use crate::models::pool_config::PoolFile;
use anyhow::{bail, Result};
use clap::Args;
use dialoguer::Confirm;

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Fetch and report, but do not write the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt (implied by --non-interactive)
    #[arg(long)]
    pub yes: bool,
}

pub fn run(ctx: &CliContext, args: AggregateArgs) -> Result<()> {
    let pool = ctx.load_pool()?;
    let accounts = pool.resolve_accounts()?;

    let _lock = match RunLock::try_acquire(&ctx.paths.run_lock)? {
        Some(lock) => lock,
        None => bail!("another poolcreds run is in progress"),
    };

    let store = ToolforgeStore;
    let result = execute(ctx, &pool, &accounts, &store, &args);

    if !args.dry_run {
        if let Err(e) = run_log::record(
            &ctx.paths,
            "aggregate",
            accounts.len(),
            Some(&pool.secrets.destination),
            &result,
        ) {
            eprintln!("warning: run log failed: {}", e);
        }
    }
    result
}

fn execute(
    ctx: &CliContext,
    pool: &PoolFile,
    accounts: &[String],
    store: &dyn SecretStore,
    args: &AggregateArgs,
) -> Result<()> {
    let pairs = aggregator::collect_credentials(
        store,
        accounts,
        &pool.secrets.user_var,
        &pool.secrets.pass_var,
    )?;
    let payload = aggregator::serialize_credentials(&pairs)?;

    if args.dry_run {
        println!(
            "Dry run: {} credentials collected, {} bytes; would write {} on {}",
            pairs.len(),
            payload.len(),
            pool.secrets.destination,
            pool.pool.tool
        );
        return Ok(());
    }

    if !args.yes && !ctx.non_interactive {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Overwrite {} on {} with {} credentials?",
                pool.secrets.destination,
                pool.pool.tool,
                pairs.len()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            bail!("aborted");
        }
    }

    store.write_secret(&pool.pool.tool, &pool.secrets.destination, &payload)?;
    println!(
        "Wrote {} credentials to {} on {}",
        pairs.len(),
        pool.secrets.destination,
        pool.pool.tool
    );
    Ok(())
}
