//! Append-only run history for pool operations.

use crate::constants;
use crate::core::file_lock::RunLock;
use crate::core::paths::PoolPaths;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub actor: String,
    /// How many accounts the run covered.
    pub accounts: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn detect_actor() -> String {
    if let Ok(user) = std::env::var("SUDO_USER") {
        if !user.is_empty() {
            return format!("{}(sudo)", user);
        }
    }
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

/// Record one run outcome. Callers inside an aggregation run already hold
/// the run lock; everyone else goes through [`record_locked`].
pub fn record(
    paths: &PoolPaths,
    action: &str,
    accounts: usize,
    destination: Option<&str>,
    result: &Result<()>,
) -> Result<()> {
    let entry = RunEntry {
        timestamp: Utc::now(),
        action: action.to_string(),
        actor: detect_actor(),
        accounts,
        destination: destination.map(|s| s.to_string()),
        success: result.is_ok(),
        error: result.as_ref().err().map(|e| format!("{:#}", e)),
    };
    let line = serde_json::to_string(&entry).context("serialize run entry")?;
    append_line(paths, &line)
}

fn append_line(paths: &PoolPaths, line: &str) -> Result<()> {
    if let Some(parent) = paths.run_log.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.run_log)
        .with_context(|| format!("open run log {}", paths.run_log.display()))?;
    writeln!(file, "{}", line).context("write run entry")?;

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(constants::RUN_LOG_MODE);
        fs::set_permissions(&paths.run_log, perm).context("set run log permissions")?;
    }

    Ok(())
}

/// Read run entries, optionally only the trailing `limit`.
pub fn read(paths: &PoolPaths, limit: Option<usize>) -> Result<Vec<RunEntry>> {
    if !paths.run_log.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&paths.run_log)
        .with_context(|| format!("open run log {}", paths.run_log.display()))?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut malformed = 0usize;

    for line in reader.lines() {
        let line = line.context("read run log line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<RunEntry>(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(_) => malformed += 1,
        }
    }

    if malformed > 0 {
        eprintln!("warning: {} malformed run log entries skipped", malformed);
    }

    if let Some(limit) = limit {
        if entries.len() > limit {
            entries = entries.split_off(entries.len() - limit);
        }
    }

    Ok(entries)
}

/// Record with the run lock held, for callers outside an aggregation run.
pub fn record_locked(
    paths: &PoolPaths,
    action: &str,
    accounts: usize,
    destination: Option<&str>,
    result: &Result<()>,
) -> Result<()> {
    let _lock = RunLock::acquire(&paths.run_lock)?;
    record(paths, action, accounts, destination, result)
}
