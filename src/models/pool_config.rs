//! Pool configuration file model (`pool.toml`).

use crate::constants;
use anyhow::{bail, Context, Result};
use glob::glob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolFile {
    pub pool: PoolSection,
    #[serde(default)]
    pub secrets: SecretsSection,
    #[serde(default)]
    pub components: ComponentsSection,
}

/// Which accounts make up the pool, and who owns the aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSection {
    /// Primary tool account; receives the aggregated credential list.
    pub tool: String,

    /// Worker name prefix (defaults to the primary tool name).
    #[serde(default)]
    pub prefix: Option<String>,

    /// Number of `<prefix>-worker-<n>` accounts when no other source is set.
    #[serde(default)]
    pub workers: Option<u32>,

    /// Explicit account list; overrides every other source.
    #[serde(default)]
    pub accounts: Vec<String>,

    /// Directory whose `*.yaml` files name the accounts, one per file.
    #[serde(default)]
    pub config_dir: Option<PathBuf>,
}

/// Names of the secrets moved per worker, and where the result lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsSection {
    #[serde(default = "default_user_var")]
    pub user_var: String,
    #[serde(default = "default_pass_var")]
    pub pass_var: String,
    #[serde(default = "default_destination")]
    pub destination: String,
}

impl Default for SecretsSection {
    fn default() -> Self {
        Self {
            user_var: default_user_var(),
            pass_var: default_pass_var(),
            destination: default_destination(),
        }
    }
}

fn default_user_var() -> String {
    "TOOL_BOT_USER".to_string()
}

fn default_pass_var() -> String {
    "TOOL_BOT_PASS".to_string()
}

fn default_destination() -> String {
    "POOL_WORKER_CREDENTIALS".to_string()
}

/// Where per-account component config YAML files are published.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentsSection {
    #[serde(default)]
    pub base_url: Option<String>,
}

impl PoolFile {
    /// Resolve the ordered account pool.
    ///
    /// Precedence: explicit `accounts` list, then `config_dir` discovery,
    /// then the `<prefix>-worker-<n>` range. Always non-empty and validated.
    pub fn resolve_accounts(&self) -> Result<Vec<String>> {
        let accounts = if !self.pool.accounts.is_empty() {
            self.pool.accounts.clone()
        } else if let Some(dir) = &self.pool.config_dir {
            discover_accounts(dir)?
        } else {
            let prefix = self.worker_prefix();
            if prefix.is_empty() {
                bail!("pool.tool is empty; set [pool] tool in {}", constants::POOL_TOML);
            }
            let workers = self.pool.workers.unwrap_or(constants::DEFAULT_WORKER_COUNT);
            (1..=workers)
                .map(|n| format!("{}-worker-{}", prefix, n))
                .collect()
        };

        if accounts.is_empty() {
            bail!("no worker accounts configured");
        }
        for account in &accounts {
            validate_account_name(account)
                .map_err(|e| anyhow::anyhow!("invalid account '{}': {}", account, e))?;
        }
        Ok(accounts)
    }

    pub fn worker_prefix(&self) -> &str {
        self.pool.prefix.as_deref().unwrap_or(&self.pool.tool)
    }
}

/// Account names double as path components and sudo targets.
pub fn validate_account_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("name cannot be empty".into());
    }
    if s.contains("..") {
        return Err("path traversal not allowed".into());
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err("only [a-zA-Z0-9._-] allowed".into());
    }
    Ok(s.to_string())
}

/// List accounts from per-account YAML files, sorted by name.
fn discover_accounts(dir: &Path) -> Result<Vec<String>> {
    let pattern = dir.join("*.yaml");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("non-UTF-8 config_dir {}", dir.display()))?;
    let mut accounts = Vec::new();
    for entry in glob(pattern).context("glob config_dir")? {
        let path = entry.context("read config_dir entry")?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            accounts.push(stem.to_string());
        }
    }
    accounts.sort();
    Ok(accounts)
}

pub fn load(path: &Path) -> Result<PoolFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read pool config {}", path.display()))?;
    let pool: PoolFile = toml::from_str(&content)
        .with_context(|| format!("parse pool config {}", path.display()))?;
    if pool.pool.tool.is_empty() {
        bail!("{}: [pool] tool is required", path.display());
    }
    Ok(pool)
}

pub fn save(path: &Path, pool: &PoolFile) -> Result<()> {
    let content = toml::to_string_pretty(pool).context("serialize pool config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pool_with(tool: &str) -> PoolFile {
        PoolFile {
            pool: PoolSection {
                tool: tool.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_range_generation() {
        let mut pool = pool_with("examplebot");
        pool.pool.workers = Some(3);
        let accounts = pool.resolve_accounts().unwrap();
        assert_eq!(
            accounts,
            vec![
                "examplebot-worker-1",
                "examplebot-worker-2",
                "examplebot-worker-3"
            ]
        );
    }

    #[test]
    fn test_default_worker_count() {
        let pool = pool_with("examplebot");
        let accounts = pool.resolve_accounts().unwrap();
        assert_eq!(accounts.len(), constants::DEFAULT_WORKER_COUNT as usize);
        assert_eq!(accounts[0], "examplebot-worker-1");
    }

    #[test]
    fn test_prefix_overrides_tool() {
        let mut pool = pool_with("examplebot");
        pool.pool.prefix = Some("pool".to_string());
        pool.pool.workers = Some(1);
        assert_eq!(pool.resolve_accounts().unwrap(), vec!["pool-worker-1"]);
    }

    #[test]
    fn test_explicit_accounts_win() {
        let mut pool = pool_with("examplebot");
        pool.pool.workers = Some(5);
        pool.pool.accounts = vec!["a".into(), "b".into()];
        assert_eq!(pool.resolve_accounts().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_explicit_accounts_validated() {
        let mut pool = pool_with("examplebot");
        pool.pool.accounts = vec!["../etc".into()];
        assert!(pool.resolve_accounts().is_err());
    }

    #[test]
    fn test_empty_tool_rejected() {
        let pool = pool_with("");
        assert!(pool.resolve_accounts().is_err());
    }

    #[test]
    fn test_config_dir_discovery() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bot-b.yaml"), "x: 1\n").unwrap();
        fs::write(dir.path().join("bot-a.yaml"), "x: 1\n").unwrap();
        fs::write(dir.path().join("README.md"), "not a config").unwrap();

        let mut pool = pool_with("examplebot");
        pool.pool.config_dir = Some(dir.path().to_path_buf());
        assert_eq!(pool.resolve_accounts().unwrap(), vec!["bot-a", "bot-b"]);
    }

    #[test]
    fn test_config_dir_empty_rejected() {
        let dir = TempDir::new().unwrap();
        let mut pool = pool_with("examplebot");
        pool.pool.config_dir = Some(dir.path().to_path_buf());
        assert!(pool.resolve_accounts().is_err());
    }

    #[test]
    fn test_validate_account_name() {
        assert!(validate_account_name("examplebot-worker-1").is_ok());
        assert!(validate_account_name("a.b_c-d").is_ok());
        assert!(validate_account_name("").is_err());
        assert!(validate_account_name("../etc").is_err());
        assert!(validate_account_name("foo bar").is_err());
        assert!(validate_account_name("foo/bar").is_err());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.toml");
        let mut pool = pool_with("examplebot");
        pool.pool.workers = Some(4);
        pool.secrets.destination = "DEST".to_string();
        save(&path, &pool).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.pool.tool, "examplebot");
        assert_eq!(loaded.pool.workers, Some(4));
        assert_eq!(loaded.secrets.destination, "DEST");
        assert_eq!(loaded.secrets.user_var, "TOOL_BOT_USER");
    }

    #[test]
    fn test_load_requires_tool() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(&path, "[pool]\ntool = \"\"\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_minimal_toml_defaults() {
        let pool: PoolFile = toml::from_str("[pool]\ntool = \"bot\"\n").unwrap();
        assert_eq!(pool.secrets.user_var, "TOOL_BOT_USER");
        assert_eq!(pool.secrets.pass_var, "TOOL_BOT_PASS");
        assert_eq!(pool.secrets.destination, "POOL_WORKER_CREDENTIALS");
        assert!(pool.components.base_url.is_none());
    }
}
