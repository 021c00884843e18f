//! Pool root resolution and file layout.

use crate::constants;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PoolPaths {
    pub root: PathBuf,
    pub pool_toml: PathBuf,
    pub run_log: PathBuf,
    pub run_lock: PathBuf,
}

impl PoolPaths {
    /// Resolve pool paths from CLI arg, env var, or auto-detection.
    pub fn resolve(root_arg: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root_arg {
            return Ok(Self::from_root(root));
        }
        if let Ok(root) = env::var("POOLCREDS_ROOT") {
            return Ok(Self::from_root(PathBuf::from(root)));
        }
        if let Some(found) = find_pool_root()? {
            return Ok(Self::from_root(found));
        }
        Ok(Self::from_root(PathBuf::from(constants::DEFAULT_POOL_ROOT)))
    }

    /// Create pool paths from a root directory.
    pub fn from_root(root: PathBuf) -> Self {
        let pool_toml = root.join(constants::POOL_TOML);
        let run_log = root.join(constants::RUN_LOG);
        let run_lock = root.join(constants::RUN_LOCK);
        Self {
            root,
            pool_toml,
            run_log,
            run_lock,
        }
    }
}

fn find_pool_root() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir().context("resolve current directory")?;
    for ancestor in cwd.ancestors() {
        if looks_like_root(ancestor) {
            return Ok(Some(ancestor.to_path_buf()));
        }
    }
    Ok(None)
}

fn looks_like_root(path: &Path) -> bool {
    path.join(constants::POOL_TOML).is_file()
}

impl std::fmt::Display for PoolPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool@{}", self.root.display())
    }
}
