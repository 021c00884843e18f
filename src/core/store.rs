//! Secret-store access behind a trait so the aggregation pipeline can run
//! against a fake in tests instead of real account impersonation.

use crate::constants;
use crate::util::toolforge;
use anyhow::{bail, Result};
use zeroize::Zeroizing;

pub trait SecretStore {
    /// Read one named secret as the given account.
    /// Fails if the account cannot be impersonated or the secret is absent.
    fn read_secret(&self, account: &str, name: &str) -> Result<Zeroizing<String>>;

    /// Create or replace one named secret for the given account.
    fn write_secret(&self, account: &str, name: &str, value: &str) -> Result<()>;
}

/// The real store: per-tool envvars reached through the Toolforge CLI.
pub struct ToolforgeStore;

impl SecretStore for ToolforgeStore {
    fn read_secret(&self, account: &str, name: &str) -> Result<Zeroizing<String>> {
        let value = Zeroizing::new(toolforge::envvar_show(account, name)?);
        validate_secret_value(account, name, &value)?;
        Ok(value)
    }

    fn write_secret(&self, account: &str, name: &str, value: &str) -> Result<()> {
        toolforge::envvar_create(account, name, value)
    }
}

/// Sanity bounds on a fetched secret.
///
/// An empty value is rejected on purpose: the CLI errors on an *unset*
/// envvar, but a var set to "" would otherwise ride silently into the
/// aggregated list and hand every consumer a worker with a blank login.
/// Aborting the run points the operator at the misconfigured account.
fn validate_secret_value(account: &str, name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("envvar {} for {} is empty", name, account);
    }
    if value.len() > constants::MAX_SECRET_SIZE {
        bail!(
            "envvar {} for {} exceeds maximum size ({} bytes, max {})",
            name,
            account,
            value.len(),
            constants::MAX_SECRET_SIZE
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_value_accepted() {
        assert!(validate_secret_value("bot-worker-1", "USER", "worker_login").is_ok());
    }

    #[test]
    fn test_empty_value_rejected() {
        let err = validate_secret_value("bot-worker-1", "PASS", "").unwrap_err();
        assert!(err.to_string().contains("bot-worker-1"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_oversized_value_rejected() {
        let big = "x".repeat(constants::MAX_SECRET_SIZE + 1);
        assert!(validate_secret_value("bot-worker-1", "PASS", &big).is_err());
    }

    #[test]
    fn test_value_at_size_cap_accepted() {
        let max = "x".repeat(constants::MAX_SECRET_SIZE);
        assert!(validate_secret_value("bot-worker-1", "PASS", &max).is_ok());
    }
}
