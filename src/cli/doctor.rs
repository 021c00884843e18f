//! Diagnostics for pool configuration and automation readiness.

use crate::cli::CliContext;
use crate::constants;
use crate::models::pool_config;
use crate::util::{privilege, toolforge};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Also probe sudo impersonation for every resolved account (slow)
    #[arg(long)]
    pub accounts: bool,
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let paths = &ctx.paths;
    let mut ok = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;

    println!("Doctor: {}", paths);

    // Pool config presence and parsability
    let pool = if paths.pool_toml.is_file() {
        match pool_config::load(&paths.pool_toml) {
            Ok(pool) => {
                println!("  [PASS] pool config parses: {}", paths.pool_toml.display());
                ok += 1;
                Some(pool)
            }
            Err(e) => {
                println!("  [FAIL] pool config unreadable: {:#}", e);
                fail += 1;
                None
            }
        }
    } else {
        println!(
            "  [FAIL] pool config missing: {} (run: poolcreds init)",
            paths.pool_toml.display()
        );
        fail += 1;
        None
    };

    // Account pool resolution
    let mut resolved: Vec<String> = Vec::new();
    if let Some(pool) = &pool {
        match pool.resolve_accounts() {
            Ok(accounts) => {
                println!("  [PASS] {} worker accounts resolved", accounts.len());
                ok += 1;
                resolved = accounts;
            }
            Err(e) => {
                println!("  [FAIL] cannot resolve accounts: {:#}", e);
                fail += 1;
            }
        }
        if pool.components.base_url.is_none() {
            println!("  [WARN] [components] base_url not set ('setup' unavailable)");
            warn += 1;
        }
    }

    // Impersonation path
    if privilege::is_root() {
        println!("  [WARN] running as root; per-account sudo rules go unexercised");
        warn += 1;
    }
    if privilege::sudo_available() {
        println!("  [PASS] sudo present: {}", constants::SUDO_BIN);
        ok += 1;
    } else {
        println!("  [FAIL] sudo missing: {}", constants::SUDO_BIN);
        fail += 1;
    }
    if toolforge::available() {
        println!("  [PASS] {} CLI available", constants::TOOLFORGE_BIN);
        ok += 1;
    } else {
        println!("  [FAIL] {} CLI not found on PATH", constants::TOOLFORGE_BIN);
        fail += 1;
    }

    // Optional per-account probe: one cheap read each
    if args.accounts && !resolved.is_empty() {
        if let Some(pool) = &pool {
            for account in &resolved {
                match toolforge::envvar_show(account, &pool.secrets.user_var) {
                    Ok(_) => {
                        println!("  [PASS] {} readable via impersonation", account);
                        ok += 1;
                    }
                    Err(e) => {
                        println!("  [FAIL] {}: {:#}", account, e);
                        fail += 1;
                    }
                }
            }
        }
    }

    // Run log readability
    match crate::core::run_log::read(paths, Some(1)) {
        Ok(entries) if entries.is_empty() => {
            println!("  [INFO] no runs recorded yet");
        }
        Ok(_) => {
            println!("  [PASS] run log readable: {}", paths.run_log.display());
            ok += 1;
        }
        Err(e) => {
            println!("  [WARN] run log unreadable: {:#}", e);
            warn += 1;
        }
    }

    println!();
    println!("Doctor summary: {} pass, {} warn, {} fail", ok, warn, fail);
    if fail > 0 {
        std::process::exit(1);
    }
    Ok(())
}
