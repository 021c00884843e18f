//! CLI routing and command dispatch.

use crate::core::paths::PoolPaths;
use crate::models::pool_config::{self, PoolFile};
use crate::util::privilege;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod accounts;
pub mod aggregate;
pub mod doctor;
pub mod init;
pub mod log;
pub mod setup;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: PoolPaths,
    pub non_interactive: bool,
}

impl CliContext {
    /// Load pool.toml, erroring with a hint when it is missing.
    pub fn load_pool(&self) -> Result<PoolFile> {
        if !self.paths.pool_toml.is_file() {
            anyhow::bail!(
                "no pool config at {} (run 'poolcreds init' first)",
                self.paths.pool_toml.display()
            );
        }
        pool_config::load(&self.paths.pool_toml)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "poolcreds",
    version,
    about = "Credential aggregation for worker tool-account pools"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "POOLCREDS_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = PoolPaths::resolve(self.root)?;
        let ctx = CliContext {
            paths,
            non_interactive: self.non_interactive,
        };

        // Commands that impersonate accounts need sudo and the platform CLI
        if self.command.requires_impersonation() {
            privilege::require_impersonation(self.command.name())?;
        }

        match self.command {
            Commands::Init(args) => init::run(&ctx, args),
            Commands::Accounts(args) => accounts::run(&ctx, args),
            Commands::Aggregate(args) => aggregate::run(&ctx, args),
            Commands::Setup(args) => setup::run(&ctx, args),
            Commands::Log(args) => log::run(&ctx, args),
            Commands::Doctor(args) => doctor::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter pool.toml
    Init(init::InitArgs),
    /// Show the resolved worker account pool
    Accounts(accounts::AccountsArgs),
    /// Collect worker credentials and store the aggregated list
    Aggregate(aggregate::AggregateArgs),
    /// Ensure component configs exist for every account
    Setup(setup::SetupArgs),
    /// Show the run history
    Log(log::LogArgs),
    /// Diagnose installation and configuration (safe, read-only)
    Doctor(doctor::DoctorArgs),
}

impl Commands {
    /// Whether this command impersonates tool accounts.
    /// Dry-run aggregation still performs the reads, so it counts.
    pub fn requires_impersonation(&self) -> bool {
        matches!(self, Commands::Aggregate(_) | Commands::Setup(_))
    }

    /// Command name for error messages.
    pub fn name(&self) -> &str {
        match self {
            Commands::Init(_) => "init",
            Commands::Accounts(_) => "accounts",
            Commands::Aggregate(_) => "aggregate",
            Commands::Setup(_) => "setup",
            Commands::Log(_) => "log",
            Commands::Doctor(_) => "doctor",
        }
    }
}
