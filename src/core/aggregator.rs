//! The credential aggregation pipeline: read two secrets per worker account,
//! in configured order, then serialize the whole pool as one JSON array.
//!
//! Fail-fast by contract: the first failed read aborts the run before
//! anything is written, so a partial pool can never reach the destination.

use crate::core::store::SecretStore;
use crate::models::credential::CredentialPair;
use anyhow::{bail, Context, Result};
use zeroize::Zeroizing;

/// Read `user_var` and `pass_var` for every account, preserving order.
///
/// Prints one progress line per account before its reads, so an operator
/// watching a stuck run can see which impersonation is hanging.
pub fn collect_credentials(
    store: &dyn SecretStore,
    accounts: &[String],
    user_var: &str,
    pass_var: &str,
) -> Result<Vec<CredentialPair>> {
    if accounts.is_empty() {
        bail!("no worker accounts to aggregate");
    }

    let mut pairs = Vec::with_capacity(accounts.len());
    for account in accounts {
        println!("Fetching credentials for {}", account);
        let user = store
            .read_secret(account, user_var)
            .with_context(|| format!("fetch {} for {}", user_var, account))?;
        let pass = store
            .read_secret(account, pass_var)
            .with_context(|| format!("fetch {} for {}", pass_var, account))?;
        pairs.push(CredentialPair {
            user: user.to_string(),
            pass: pass.to_string(),
        });
    }

    // One entry per account, same order. Anything else is a bug here.
    debug_assert_eq!(pairs.len(), accounts.len());
    Ok(pairs)
}

/// Serialize the pool as a compact JSON array, fields `user` then `pass`.
pub fn serialize_credentials(pairs: &[CredentialPair]) -> Result<Zeroizing<String>> {
    let json = serde_json::to_string(pairs).context("serialize credential list")?;
    Ok(Zeroizing::new(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store: preloaded secrets, records every write.
    #[derive(Default)]
    struct FakeStore {
        secrets: HashMap<(String, String), String>,
        writes: RefCell<Vec<(String, String, String)>>,
    }

    impl FakeStore {
        fn with_workers(n: usize) -> Self {
            let mut store = Self::default();
            for i in 1..=n {
                let account = format!("bot-worker-{}", i);
                store.insert(&account, "USER", &format!("user_{}", i));
                store.insert(&account, "PASS", &format!("pass_{}", i));
            }
            store
        }

        fn insert(&mut self, account: &str, name: &str, value: &str) {
            self.secrets
                .insert((account.to_string(), name.to_string()), value.to_string());
        }
    }

    impl SecretStore for FakeStore {
        fn read_secret(&self, account: &str, name: &str) -> Result<Zeroizing<String>> {
            self.secrets
                .get(&(account.to_string(), name.to_string()))
                .map(|v| Zeroizing::new(v.clone()))
                .ok_or_else(|| anyhow!("no secret {} for {}", name, account))
        }

        fn write_secret(&self, account: &str, name: &str, value: &str) -> Result<()> {
            self.writes.borrow_mut().push((
                account.to_string(),
                name.to_string(),
                value.to_string(),
            ));
            Ok(())
        }
    }

    fn accounts(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("bot-worker-{}", i)).collect()
    }

    #[test]
    fn test_one_entry_per_account_in_order() {
        let store = FakeStore::with_workers(4);
        let pairs = collect_credentials(&store, &accounts(4), "USER", "PASS").unwrap();
        assert_eq!(pairs.len(), 4);
        for (i, pair) in pairs.iter().enumerate() {
            assert_eq!(pair.user, format!("user_{}", i + 1));
            assert_eq!(pair.pass, format!("pass_{}", i + 1));
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        let store = FakeStore::default();
        assert!(collect_credentials(&store, &[], "USER", "PASS").is_err());
    }

    #[test]
    fn test_two_worker_scenario_output() {
        let mut store = FakeStore::default();
        store.insert("bot-worker-1", "USER", "u1");
        store.insert("bot-worker-1", "PASS", "p1");
        store.insert("bot-worker-2", "USER", "u2");
        store.insert("bot-worker-2", "PASS", "p2");

        let pairs = collect_credentials(&store, &accounts(2), "USER", "PASS").unwrap();
        let json = serialize_credentials(&pairs).unwrap();
        assert_eq!(
            json.as_str(),
            r#"[{"user":"u1","pass":"p1"},{"user":"u2","pass":"p2"}]"#
        );
    }

    #[test]
    fn test_failure_mid_pool_aborts_without_writes() {
        let mut store = FakeStore::with_workers(3);
        // Break the second worker's password
        store
            .secrets
            .remove(&("bot-worker-2".to_string(), "PASS".to_string()));

        let err = collect_credentials(&store, &accounts(3), "USER", "PASS").unwrap_err();
        assert!(err.to_string().contains("bot-worker-2"));
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn test_missing_user_var_aborts() {
        let mut store = FakeStore::with_workers(2);
        store
            .secrets
            .remove(&("bot-worker-1".to_string(), "USER".to_string()));
        assert!(collect_credentials(&store, &accounts(2), "USER", "PASS").is_err());
    }

    #[test]
    fn test_roundtrip_through_serialization() {
        let store = FakeStore::with_workers(3);
        let pairs = collect_credentials(&store, &accounts(3), "USER", "PASS").unwrap();
        let json = serialize_credentials(&pairs).unwrap();
        let parsed: Vec<CredentialPair> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pairs);
    }

    #[test]
    fn test_write_recorded_by_fake() {
        let store = FakeStore::with_workers(1);
        store.write_secret("bot", "DEST", "[]").unwrap();
        assert_eq!(
            store.writes.borrow().as_slice(),
            &[("bot".to_string(), "DEST".to_string(), "[]".to_string())]
        );
    }
}
