use crate::cli::CliContext;
use crate::constants;
use crate::models::pool_config::{self, PoolFile, PoolSection};
use anyhow::{bail, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Primary tool account (owns the aggregated credential list)
    pub tool: String,

    /// Number of worker accounts
    #[arg(long, default_value_t = constants::DEFAULT_WORKER_COUNT)]
    pub workers: u32,

    /// Overwrite an existing pool.toml
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &CliContext, args: InitArgs) -> Result<()> {
    let paths = &ctx.paths;
    if paths.pool_toml.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            paths.pool_toml.display()
        );
    }
    if args.workers == 0 {
        bail!("--workers must be at least 1");
    }

    let pool = PoolFile {
        pool: PoolSection {
            tool: args.tool.clone(),
            workers: Some(args.workers),
            ..Default::default()
        },
        ..Default::default()
    };
    pool.resolve_accounts()?;
    pool_config::save(&paths.pool_toml, &pool)?;

    println!("Wrote {}", paths.pool_toml.display());
    println!(
        "Pool: {}-worker-1 .. {}-worker-{}",
        pool.worker_prefix(),
        pool.worker_prefix(),
        args.workers
    );
    Ok(())
}
