//! Preconditions for commands that impersonate tool accounts.

use crate::constants;
use crate::util::toolforge;
use anyhow::{bail, Result};
use std::path::Path;

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Whether the sudo binary used for impersonation exists.
pub fn sudo_available() -> bool {
    Path::new(constants::SUDO_BIN).exists()
}

/// Require the impersonation path (sudo + toolforge CLI) for a command.
///
/// Root is refused: impersonation is per tool account, and a root-run
/// process would hide misconfigured sudo rules until production.
pub fn require_impersonation(action: &str) -> Result<()> {
    if is_root() {
        bail!(
            "'{}' must run as a tool maintainer, not root (sudo rules are per-account)",
            action
        );
    }
    if !sudo_available() {
        bail!("'{}' requires {} for account impersonation", action, constants::SUDO_BIN);
    }
    if !toolforge::available() {
        bail!("'{}' requires the {} CLI on PATH", action, constants::TOOLFORGE_BIN);
    }
    Ok(())
}
